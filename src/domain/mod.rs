//! Records and documents of the recruitment gateway schema.
//!
//! Field names follow the gateway (Spanish, camelCase on the wire).

pub mod analytics;
pub mod empresa;
pub mod entrevista;
pub mod evaluacion;
pub mod oferta;
pub mod postulacion;
pub mod visita;

pub use analytics::AnalyticsClient;
pub use empresa::Empresa;
pub use entrevista::Entrevista;
pub use evaluacion::Evaluacion;
pub use oferta::OfertaTrabajo;
pub use postulacion::Postulacion;
pub use visita::Visita;
