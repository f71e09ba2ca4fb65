//! Transaction payloads.
//!
//! Payloads are a closed set of tagged variants. On the wire each variant is a
//! JSON object whose `type` field names the variant; an unknown `type` fails to
//! decode rather than being carried along untyped.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// A report of energy produced by a node from a given source.
    EnergyContribution { amount_kwh: f64, source_id: String },
}

impl Payload {
    pub fn energy(amount_kwh: f64, source_id: impl Into<String>) -> Self {
        Self::EnergyContribution {
            amount_kwh,
            source_id: source_id.into(),
        }
    }

    /// The wire tag of this payload.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::EnergyContribution { .. } => "energy_contribution",
        }
    }

    pub fn is_energy_contribution(&self) -> bool {
        matches!(self, Self::EnergyContribution { .. })
    }

    /// Reported kWh for energy payloads, zero for anything else.
    pub fn energy_kwh(&self) -> f64 {
        match self {
            Self::EnergyContribution { amount_kwh, .. } => *amount_kwh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_payload_wire_shape() {
        let p = Payload::energy(50.0, "solar_panel_1");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["type"], "energy_contribution");
        assert_eq!(json["amount_kwh"], 50.0);
        assert_eq!(json["source_id"], "solar_panel_1");
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let raw = r#"{"type":"grid_sale","amount_kwh":1.0}"#;
        assert!(serde_json::from_str::<Payload>(raw).is_err());
    }

    #[test]
    fn accessors() {
        let p = Payload::energy(12.5, "wind_1");
        assert!(p.is_energy_contribution());
        assert_eq!(p.energy_kwh(), 12.5);
        assert_eq!(p.type_tag(), "energy_contribution");
    }
}
