//! Ship part editor shell.
//!
//! The editor is a plain data model: a fixed palette of part tool items and
//! a [`ShipDesign`] assembling placements of those parts.  Persistence lives
//! in [`crate::save`]; nothing here touches the filesystem.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, LabResult};

/// Every part the editor can place.  The palette is fixed — the editor
/// builds its tool list from [`PartKind::ALL`], never from user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    CargoBay,
    FuelTank,
    EnergyTank,
    AmmoBox,
    Thruster,
    ProjectileGun,
    TractorBeam,
    SolarPanel,
    ShieldGenerator,
    Brain,
}

impl PartKind {
    pub const ALL: [PartKind; 10] = [
        PartKind::CargoBay,
        PartKind::FuelTank,
        PartKind::EnergyTank,
        PartKind::AmmoBox,
        PartKind::Thruster,
        PartKind::ProjectileGun,
        PartKind::TractorBeam,
        PartKind::SolarPanel,
        PartKind::ShieldGenerator,
        PartKind::Brain,
    ];

    /// Display label used in tool lists and logs.
    pub fn label(self) -> &'static str {
        match self {
            PartKind::CargoBay => "Cargo Bay",
            PartKind::FuelTank => "Fuel Tank",
            PartKind::EnergyTank => "Energy Tank",
            PartKind::AmmoBox => "Ammo Box",
            PartKind::Thruster => "Thruster",
            PartKind::ProjectileGun => "Projectile Gun",
            PartKind::TractorBeam => "Tractor Beam",
            PartKind::SolarPanel => "Solar Panel",
            PartKind::ShieldGenerator => "Shield Generator",
            PartKind::Brain => "Brain",
        }
    }

    /// Nominal dry mass of the part at scale 1.0, in tonnes.
    /// Drives the design mass readout in the editor HUD.
    pub fn base_mass(self) -> f32 {
        match self {
            PartKind::CargoBay => 4.0,
            PartKind::FuelTank => 3.0,
            PartKind::EnergyTank => 2.5,
            PartKind::AmmoBox => 2.0,
            PartKind::Thruster => 1.5,
            PartKind::ProjectileGun => 1.8,
            PartKind::TractorBeam => 1.2,
            PartKind::SolarPanel => 0.8,
            PartKind::ShieldGenerator => 2.2,
            PartKind::Brain => 0.6,
        }
    }
}

/// One entry in the editor's tool palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolItem {
    pub kind: PartKind,
    pub label: &'static str,
}

/// The fixed tool palette, in display order.
pub fn tool_items() -> Vec<ToolItem> {
    PartKind::ALL
        .iter()
        .map(|&kind| ToolItem {
            kind,
            label: kind.label(),
        })
        .collect()
}

/// A placed part: kind plus transform, in TOML-friendly plain arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPlacement {
    pub kind: PartKind,
    pub position: [f32; 3],
    /// Orientation quaternion, `[x, y, z, w]`.
    pub orientation: [f32; 4],
    pub scale: f32,
}

impl PartPlacement {
    /// An unrotated, unit-scale placement at `position`.
    pub fn at(kind: PartKind, position: [f32; 3]) -> Self {
        Self {
            kind,
            position,
            orientation: [0.0, 0.0, 0.0, 1.0],
            scale: 1.0,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.position.iter().any(|v| !v.is_finite()) {
            return Err(format!("{} has a non-finite position", self.kind.label()));
        }
        if self.orientation.iter().any(|v| !v.is_finite()) {
            return Err(format!("{} has a non-finite orientation", self.kind.label()));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(format!(
                "{} has invalid scale {}",
                self.kind.label(),
                self.scale
            ));
        }
        Ok(())
    }
}

/// A named assembly of part placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDesign {
    pub name: String,
    pub parts: Vec<PartPlacement>,
}

impl ShipDesign {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
        }
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn add_part(&mut self, placement: PartPlacement) {
        self.parts.push(placement);
    }

    /// Remove the part at `index`, returning it.
    pub fn remove_part(&mut self, index: usize) -> LabResult<PartPlacement> {
        if index >= self.parts.len() {
            return Err(LabError::PartIndexOutOfRange {
                index,
                len: self.parts.len(),
            });
        }
        Ok(self.parts.remove(index))
    }

    pub fn clear(&mut self) {
        self.parts.clear();
    }

    /// Total mass of the design: base part mass scaled by volume (`scale³`).
    pub fn total_mass(&self) -> f32 {
        self.parts
            .iter()
            .map(|p| p.kind.base_mass() * p.scale * p.scale * p.scale)
            .sum()
    }

    /// Check the design is saveable: named, non-empty, finite transforms,
    /// and carrying exactly one brain.
    pub fn validate(&self) -> LabResult<()> {
        if self.name.trim().is_empty() {
            return Err(LabError::InvalidDesign {
                reason: "design name is empty".to_string(),
            });
        }
        if self.parts.is_empty() {
            return Err(LabError::InvalidDesign {
                reason: "design has no parts".to_string(),
            });
        }
        for placement in &self.parts {
            if let Err(reason) = placement.validate() {
                return Err(LabError::InvalidDesign { reason });
            }
        }
        let brains = self
            .parts
            .iter()
            .filter(|p| p.kind == PartKind::Brain)
            .count();
        if brains != 1 {
            return Err(LabError::InvalidDesign {
                reason: format!("design needs exactly one brain, found {brains}"),
            });
        }
        Ok(())
    }
}
