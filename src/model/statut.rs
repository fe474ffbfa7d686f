use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle status of a demande. Every demande starts "en cours"; an
/// administrator moves it to "traité" and there is no way back.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Statut {
    #[serde(rename = "en cours")]
    #[strum(serialize = "en cours")]
    EnCours,

    #[serde(rename = "traité")]
    #[strum(serialize = "traité")]
    Traite,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Statut;

    #[test]
    fn wire_values_match_the_french_labels() {
        assert_eq!(
            serde_json::to_string(&Statut::EnCours).unwrap(),
            r#""en cours""#
        );
        assert_eq!(serde_json::to_string(&Statut::Traite).unwrap(), r#""traité""#);

        let parsed: Statut = serde_json::from_str(r#""traité""#).unwrap();
        assert_eq!(parsed, Statut::Traite);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for statut in [Statut::EnCours, Statut::Traite] {
            assert_eq!(Statut::from_str(&statut.to_string()).unwrap(), statut);
        }
    }
}
