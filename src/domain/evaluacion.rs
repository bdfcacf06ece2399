use serde::{Deserialize, Serialize};

use crate::graphql::ValidationError;
use crate::hook::validate::{require_in_range, require_non_empty, Validate};
use crate::hook::{Entity, EntityDocuments, OperationDoc};

/// Scores are on a 0-10 scale
pub const MAX_SCORE: f64 = 10.0;

/// Evaluation written after an interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluacion {
  pub id: String,
  pub entrevista_id: String,
  pub calificacion_tecnica: f64,
  pub calificacion_actitud: f64,
  pub calificacion_general: f64,
  #[serde(default)]
  pub comentarios: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluacionDraft {
  pub entrevista_id: String,
  pub calificacion_tecnica: f64,
  pub calificacion_actitud: f64,
  pub calificacion_general: f64,
  pub comentarios: Option<String>,
}

impl Validate for EvaluacionDraft {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("entrevistaId", &self.entrevista_id)?;
    require_in_range("calificacionTecnica", self.calificacion_tecnica, 0.0, MAX_SCORE)?;
    require_in_range("calificacionActitud", self.calificacion_actitud, 0.0, MAX_SCORE)?;
    require_in_range("calificacionGeneral", self.calificacion_general, 0.0, MAX_SCORE)
  }
}

impl Entity for Evaluacion {
  type Draft = EvaluacionDraft;

  const LABEL: &'static str = "evaluacion";

  const DOCUMENTS: EntityDocuments = EntityDocuments {
    list: OperationDoc {
      name: "evaluaciones",
      document: r#"query evaluaciones {
  evaluaciones {
    id entrevistaId calificacionTecnica calificacionActitud calificacionGeneral comentarios
  }
}"#,
    },
    create: OperationDoc {
      name: "createEvaluacion",
      document: r#"mutation createEvaluacion($input: EvaluacionInput!) {
  createEvaluacion(input: $input) {
    id entrevistaId calificacionTecnica calificacionActitud calificacionGeneral comentarios
  }
}"#,
    },
    update: OperationDoc {
      name: "updateEvaluacion",
      document: r#"mutation updateEvaluacion($id: ID!, $input: EvaluacionInput!) {
  updateEvaluacion(id: $id, input: $input) {
    id entrevistaId calificacionTecnica calificacionActitud calificacionGeneral comentarios
  }
}"#,
    },
    delete: OperationDoc {
      name: "deleteEvaluacion",
      document: r#"mutation deleteEvaluacion($id: ID!) {
  deleteEvaluacion(id: $id)
}"#,
    },
  };

  fn id(&self) -> &str {
    &self.id
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_scores_out_of_range() {
    let draft = EvaluacionDraft {
      entrevista_id: "3".into(),
      calificacion_tecnica: 8.0,
      calificacion_actitud: 12.0,
      calificacion_general: 9.0,
      comentarios: None,
    };
    assert_eq!(draft.validate().unwrap_err().field, "calificacionActitud");
  }
}
