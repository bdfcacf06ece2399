//! How each CRUD entity is shown as a table row and edited as a form.

use ratatui::prelude::*;

use crate::domain::empresa::EmpresaDraft;
use crate::domain::entrevista::EntrevistaDraft;
use crate::domain::evaluacion::EvaluacionDraft;
use crate::domain::oferta::OfertaTrabajoDraft;
use crate::domain::postulacion::PostulacionDraft;
use crate::domain::visita::VisitaDraft;
use crate::domain::{Empresa, Entrevista, Evaluacion, OfertaTrabajo, Postulacion, Visita};
use crate::graphql::ValidationError;
use crate::hook::Entity;
use crate::ui::renderfns::{estado_color, optional, score_color};

pub trait Record: Entity {
  const TITLE: &'static str;
  const HEADERS: &'static [&'static str];
  const WIDTHS: &'static [Constraint];
  /// Form labels, in the order `draft` reads them
  const FIELDS: &'static [&'static str];

  /// One string per header
  fn columns(&self) -> Vec<String>;

  /// Column index and colour to highlight, if any
  fn accent(&self) -> Option<(usize, Color)> {
    None
  }

  /// Current values in `FIELDS` order, to prefill the edit form
  fn form_values(&self) -> Vec<String>;

  /// Build a draft from form values. Only parsing happens here; the hook
  /// validates the draft before sending it.
  fn draft(values: &[String]) -> Result<Self::Draft, ValidationError>;

  /// Case-insensitive match against any column.
  fn matches(&self, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    self
      .columns()
      .iter()
      .any(|c| c.to_lowercase().contains(&needle))
  }
}

fn text(values: &[String], i: usize) -> String {
  values.get(i).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn optional_text(values: &[String], i: usize) -> Option<String> {
  Some(text(values, i)).filter(|v| !v.is_empty())
}

fn number(values: &[String], i: usize, field: &'static str) -> Result<f64, ValidationError> {
  let raw = text(values, i);
  raw
    .replace(',', ".")
    .parse::<f64>()
    .map_err(|_| ValidationError::new(field, format!("'{}' is not a number", raw)))
}

impl Record for Empresa {
  const TITLE: &'static str = "Empresas";
  const HEADERS: &'static [&'static str] = &["ID", "NOMBRE", "CORREO", "RUBRO"];
  const WIDTHS: &'static [Constraint] = &[
    Constraint::Length(8),
    Constraint::Percentage(35),
    Constraint::Percentage(35),
    Constraint::Fill(1),
  ];
  const FIELDS: &'static [&'static str] = &["nombre", "correo", "rubro"];

  fn columns(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.nombre.clone(),
      self.correo.clone(),
      self.rubro.clone(),
    ]
  }

  fn form_values(&self) -> Vec<String> {
    vec![self.nombre.clone(), self.correo.clone(), self.rubro.clone()]
  }

  fn draft(values: &[String]) -> Result<EmpresaDraft, ValidationError> {
    Ok(EmpresaDraft {
      nombre: text(values, 0),
      correo: text(values, 1),
      rubro: text(values, 2),
    })
  }
}

impl Record for OfertaTrabajo {
  const TITLE: &'static str = "Ofertas";
  const HEADERS: &'static [&'static str] = &["ID", "TITULO", "SALARIO", "ESTADO", "EMPRESA"];
  const WIDTHS: &'static [Constraint] = &[
    Constraint::Length(8),
    Constraint::Percentage(40),
    Constraint::Length(12),
    Constraint::Length(14),
    Constraint::Fill(1),
  ];
  const FIELDS: &'static [&'static str] =
    &["titulo", "descripcion", "salario", "estado", "empresaId"];

  fn columns(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.titulo.clone(),
      format!("{:.2}", self.salario),
      optional(self.estado.as_deref()),
      self.empresa_id.clone(),
    ]
  }

  fn accent(&self) -> Option<(usize, Color)> {
    self.estado.as_deref().map(|e| (3, estado_color(e)))
  }

  fn form_values(&self) -> Vec<String> {
    vec![
      self.titulo.clone(),
      self.descripcion.clone(),
      self.salario.to_string(),
      self.estado.clone().unwrap_or_default(),
      self.empresa_id.clone(),
    ]
  }

  fn draft(values: &[String]) -> Result<OfertaTrabajoDraft, ValidationError> {
    Ok(OfertaTrabajoDraft {
      titulo: text(values, 0),
      descripcion: text(values, 1),
      salario: number(values, 2, "salario")?,
      estado: optional_text(values, 3),
      empresa_id: text(values, 4),
    })
  }
}

impl Record for Postulacion {
  const TITLE: &'static str = "Postulaciones";
  const HEADERS: &'static [&'static str] =
    &["ID", "CANDIDATO", "CORREO", "OFERTA", "ESTADO", "FECHA"];
  const WIDTHS: &'static [Constraint] = &[
    Constraint::Length(8),
    Constraint::Percentage(25),
    Constraint::Percentage(25),
    Constraint::Length(8),
    Constraint::Length(14),
    Constraint::Fill(1),
  ];
  const FIELDS: &'static [&'static str] = &["candidato", "correo", "ofertaId", "estado"];

  fn columns(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.candidato.clone(),
      self.correo.clone(),
      self.oferta_id.clone(),
      self.estado.clone(),
      optional(self.fecha_postulacion.as_deref()),
    ]
  }

  fn accent(&self) -> Option<(usize, Color)> {
    Some((4, estado_color(&self.estado)))
  }

  fn form_values(&self) -> Vec<String> {
    vec![
      self.candidato.clone(),
      self.correo.clone(),
      self.oferta_id.clone(),
      self.estado.clone(),
    ]
  }

  fn draft(values: &[String]) -> Result<PostulacionDraft, ValidationError> {
    Ok(PostulacionDraft {
      candidato: text(values, 0),
      correo: text(values, 1),
      oferta_id: text(values, 2),
      estado: text(values, 3),
    })
  }
}

impl Record for Entrevista {
  const TITLE: &'static str = "Entrevistas";
  const HEADERS: &'static [&'static str] =
    &["ID", "POSTULACION", "FECHA", "ENTREVISTADOR", "MODALIDAD"];
  const WIDTHS: &'static [Constraint] = &[
    Constraint::Length(8),
    Constraint::Length(12),
    Constraint::Length(20),
    Constraint::Percentage(35),
    Constraint::Fill(1),
  ];
  const FIELDS: &'static [&'static str] = &["postulacionId", "fecha", "entrevistador", "modalidad"];

  fn columns(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.postulacion_id.clone(),
      self.fecha.clone(),
      self.entrevistador.clone(),
      optional(self.modalidad.as_deref()),
    ]
  }

  fn form_values(&self) -> Vec<String> {
    vec![
      self.postulacion_id.clone(),
      self.fecha.clone(),
      self.entrevistador.clone(),
      self.modalidad.clone().unwrap_or_default(),
    ]
  }

  fn draft(values: &[String]) -> Result<EntrevistaDraft, ValidationError> {
    Ok(EntrevistaDraft {
      postulacion_id: text(values, 0),
      fecha: text(values, 1),
      entrevistador: text(values, 2),
      modalidad: optional_text(values, 3),
    })
  }
}

impl Record for Evaluacion {
  const TITLE: &'static str = "Evaluaciones";
  const HEADERS: &'static [&'static str] =
    &["ID", "ENTREVISTA", "TECNICA", "ACTITUD", "GENERAL", "COMENTARIOS"];
  const WIDTHS: &'static [Constraint] = &[
    Constraint::Length(8),
    Constraint::Length(12),
    Constraint::Length(9),
    Constraint::Length(9),
    Constraint::Length(9),
    Constraint::Fill(1),
  ];
  const FIELDS: &'static [&'static str] = &[
    "entrevistaId",
    "calificacionTecnica",
    "calificacionActitud",
    "calificacionGeneral",
    "comentarios",
  ];

  fn columns(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.entrevista_id.clone(),
      format!("{:.1}", self.calificacion_tecnica),
      format!("{:.1}", self.calificacion_actitud),
      format!("{:.1}", self.calificacion_general),
      optional(self.comentarios.as_deref()),
    ]
  }

  fn accent(&self) -> Option<(usize, Color)> {
    Some((4, score_color(self.calificacion_general)))
  }

  fn form_values(&self) -> Vec<String> {
    vec![
      self.entrevista_id.clone(),
      self.calificacion_tecnica.to_string(),
      self.calificacion_actitud.to_string(),
      self.calificacion_general.to_string(),
      self.comentarios.clone().unwrap_or_default(),
    ]
  }

  fn draft(values: &[String]) -> Result<EvaluacionDraft, ValidationError> {
    Ok(EvaluacionDraft {
      entrevista_id: text(values, 0),
      calificacion_tecnica: number(values, 1, "calificacionTecnica")?,
      calificacion_actitud: number(values, 2, "calificacionActitud")?,
      calificacion_general: number(values, 3, "calificacionGeneral")?,
      comentarios: optional_text(values, 4),
    })
  }
}

impl Record for Visita {
  const TITLE: &'static str = "Visitas";
  const HEADERS: &'static [&'static str] = &["ID", "PAGINA", "USUARIO", "FECHA"];
  const WIDTHS: &'static [Constraint] = &[
    Constraint::Length(8),
    Constraint::Percentage(45),
    Constraint::Percentage(25),
    Constraint::Fill(1),
  ];
  const FIELDS: &'static [&'static str] = &["pagina", "usuario"];

  fn columns(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.pagina.clone(),
      optional(self.usuario.as_deref()),
      self.fecha.clone(),
    ]
  }

  fn form_values(&self) -> Vec<String> {
    vec![self.pagina.clone(), self.usuario.clone().unwrap_or_default()]
  }

  fn draft(values: &[String]) -> Result<VisitaDraft, ValidationError> {
    Ok(VisitaDraft {
      pagina: text(values, 0),
      usuario: optional_text(values, 1),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn values(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|v| v.to_string()).collect()
  }

  #[test]
  fn test_headers_match_columns() {
    let oferta = OfertaTrabajo {
      id: "1".into(),
      titulo: "Backend".into(),
      descripcion: String::new(),
      salario: 1500.0,
      estado: None,
      empresa_id: "9".into(),
    };
    assert_eq!(oferta.columns().len(), OfertaTrabajo::HEADERS.len());
    assert_eq!(OfertaTrabajo::WIDTHS.len(), OfertaTrabajo::HEADERS.len());
    assert_eq!(oferta.columns()[2], "1500.00");
    assert_eq!(oferta.columns()[3], "-");
    assert!(oferta.accent().is_none());
  }

  #[test]
  fn test_form_values_round_trip_through_draft() {
    let evaluacion = Evaluacion {
      id: "3".into(),
      entrevista_id: "7".into(),
      calificacion_tecnica: 8.5,
      calificacion_actitud: 9.0,
      calificacion_general: 8.0,
      comentarios: None,
    };
    let draft = Evaluacion::draft(&evaluacion.form_values()).unwrap();
    assert_eq!(draft.entrevista_id, "7");
    assert_eq!(draft.calificacion_tecnica, 8.5);
    assert!(draft.comentarios.is_none());
  }

  #[test]
  fn test_draft_rejects_non_numeric_salary() {
    let err = OfertaTrabajo::draft(&values(&["Dev", "", "mucho", "", "1"])).unwrap_err();
    assert_eq!(err.field, "salario");
  }

  #[test]
  fn test_draft_accepts_decimal_comma() {
    let draft = OfertaTrabajo::draft(&values(&["Dev", "", "1200,50", "abierta", "1"])).unwrap();
    assert_eq!(draft.salario, 1200.5);
    assert_eq!(draft.estado.as_deref(), Some("abierta"));
  }

  #[test]
  fn test_draft_trims_and_drops_blank_optionals() {
    let draft = Visita::draft(&values(&[" /ofertas ", "  "])).unwrap();
    assert_eq!(draft.pagina, "/ofertas");
    assert!(draft.usuario.is_none());
  }

  #[test]
  fn test_matches_any_column() {
    let empresa = Empresa {
      id: "1".into(),
      nombre: "Acme".into(),
      correo: "rrhh@acme.com".into(),
      rubro: "Retail".into(),
    };
    assert!(empresa.matches("retail"));
    assert!(empresa.matches("RRHH"));
    assert!(!empresa.matches("mineria"));
  }
}
