use crate::error::{AdvisorError, Result};
use crate::models::Zone;
use std::collections::HashSet;

/// Zones loaded from config at startup. Never changes afterwards.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    pub fn new(zones: Vec<Zone>) -> Result<Self> {
        let mut seen = HashSet::new();
        for zone in &zones {
            if !seen.insert(zone.id) {
                return Err(AdvisorError::Config(format!(
                    "duplicate zone id {}",
                    zone.id
                )));
            }
            if !zone.area_m2.is_finite() || zone.area_m2 <= 0.0 {
                return Err(AdvisorError::Config(format!(
                    "zone {} ({}) must have a positive area, got {}",
                    zone.id, zone.name, zone.area_m2
                )));
            }
        }
        Ok(Self { zones })
    }

    /// Zones in configured order.
    pub fn all(&self) -> &[Zone] {
        &self.zones
    }

    pub fn get(&self, id: u32) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn first(&self) -> Option<&Zone> {
        self.zones.first()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoilType;

    #[test]
    fn lookups_follow_configured_order() {
        let registry = ZoneRegistry::new(Zone::defaults()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.first().map(|z| z.id), Some(1));
        assert_eq!(registry.get(3).map(|z| z.name.as_str()), Some("Herb Garden"));
        assert!(registry.get(42).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let zones = vec![
            Zone::new(1, "North", 10.0, SoilType::Clay),
            Zone::new(1, "South", 12.0, SoilType::Sandy),
        ];
        assert!(matches!(
            ZoneRegistry::new(zones),
            Err(AdvisorError::Config(_))
        ));
    }

    #[test]
    fn non_positive_area_is_rejected() {
        for area in [0.0, -3.0, f64::NAN] {
            let zones = vec![Zone::new(4, "Bare", area, SoilType::Loamy)];
            assert!(ZoneRegistry::new(zones).is_err());
        }
    }

    #[test]
    fn empty_registry_is_allowed() {
        let registry = ZoneRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.first().is_none());
    }
}
