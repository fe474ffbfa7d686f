pub mod attestation;
pub mod demandes;
pub mod parada;
pub mod send_email;
