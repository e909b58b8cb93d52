use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Loamy,
    Clay,
    Sandy,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Loamy => "Loamy",
            SoilType::Clay => "Clay",
            SoilType::Sandy => "Sandy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "loamy" | "loam" => Some(SoilType::Loamy),
            "clay" => Some(SoilType::Clay),
            "sandy" | "sand" => Some(SoilType::Sandy),
            _ => None,
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Crop grouping that drives zone selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneCategory {
    Vegetables,
    Fruits,
    Herbs,
    #[default]
    General,
}

impl ZoneCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneCategory::Vegetables => "Vegetables",
            ZoneCategory::Fruits => "Fruits",
            ZoneCategory::Herbs => "Herbs",
            ZoneCategory::General => "General",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vegetables" | "vegetable" => Some(ZoneCategory::Vegetables),
            "fruits" | "fruit" => Some(ZoneCategory::Fruits),
            "herbs" | "herb" => Some(ZoneCategory::Herbs),
            "general" => Some(ZoneCategory::General),
            _ => None,
        }
    }

    /// Shallow-rooted produce that suffers first when the soil dries out.
    pub fn is_drought_sensitive(&self) -> bool {
        matches!(self, ZoneCategory::Vegetables | ZoneCategory::Fruits)
    }

    pub fn is_heat_sensitive(&self) -> bool {
        matches!(self, ZoneCategory::Herbs)
    }
}

impl std::fmt::Display for ZoneCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: u32,
    pub name: String,
    pub area_m2: f64,
    pub soil_type: SoilType,
    #[serde(default)]
    pub category: ZoneCategory,
}

impl Zone {
    pub fn new(id: u32, name: impl Into<String>, area_m2: f64, soil_type: SoilType) -> Self {
        Self {
            id,
            name: name.into(),
            area_m2,
            soil_type,
            category: ZoneCategory::General,
        }
    }

    pub fn with_category(mut self, category: ZoneCategory) -> Self {
        self.category = category;
        self
    }

    /// Zone layout of a small mixed farm, used when the config lists none.
    pub fn defaults() -> Vec<Zone> {
        vec![
            Zone::new(1, "Vegetable Garden", 150.0, SoilType::Loamy)
                .with_category(ZoneCategory::Vegetables),
            Zone::new(2, "Fruit Orchard", 300.0, SoilType::Clay)
                .with_category(ZoneCategory::Fruits),
            Zone::new(3, "Herb Garden", 50.0, SoilType::Sandy).with_category(ZoneCategory::Herbs),
        ]
    }
}

/// A configured zone enriched with what the ledger knows about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatus {
    #[serde(flatten)]
    pub zone: Zone,
    pub last_irrigation: Option<chrono::DateTime<chrono::Utc>>,
    pub active: bool,
}
