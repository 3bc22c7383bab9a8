//! Domain ports (hexagonal architecture boundaries)
//!
//! Ports define the interfaces between the domain core and the outside world.
//! These are trait contracts that external adapters implement.

pub mod audio_files;
pub mod credentials;

pub use audio_files::AudioFileStore;
pub use credentials::CredentialVerifier;
