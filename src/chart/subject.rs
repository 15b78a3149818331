//! The person a chart is cast for

use serde::{Deserialize, Serialize};

/// Birth data identifying a chart subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthSubject {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Offset from UTC in hours (e.g. -5.0, 5.5)
    pub timezone: f64,
    #[serde(default)]
    pub place: Option<String>,
}

impl BirthSubject {
    /// A subject with only a display name, for charts loaded from files
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            year: 2000,
            month: 1,
            day: 1,
            hour: 12,
            minute: 0,
            latitude: 0.0,
            longitude: 0.0,
            timezone: 0.0,
            place: None,
        }
    }

    /// Check the calendar and coordinate ranges
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=12).contains(&self.month) {
            return Err(format!("month {} out of range", self.month));
        }
        if !(1..=31).contains(&self.day) {
            return Err(format!("day {} out of range", self.day));
        }
        if self.hour > 23 || self.minute > 59 {
            return Err(format!("time {:02}:{:02} out of range", self.hour, self.minute));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!(
                "coordinates ({}, {}) out of range",
                self.latitude, self.longitude
            ));
        }
        if !(-14.0..=14.0).contains(&self.timezone) {
            return Err(format!("timezone offset {} out of range", self.timezone));
        }
        Ok(())
    }
}
