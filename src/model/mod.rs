pub mod attestation;
pub mod demande;
pub mod parada;
pub mod statut;

pub use attestation::{CreateAttestation, DemandeAttestation, PatchAttestation};
pub use demande::{Demande, DemandeBase, DemandePatch};
pub use parada::{CreateParada, DemandeChangementParada, PatchParada};
pub use statut::Statut;
