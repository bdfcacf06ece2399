use serde::{Deserialize, Serialize};

use crate::graphql::ValidationError;
use crate::hook::validate::{require_non_empty, Validate};
use crate::hook::{Entity, EntityDocuments, OperationDoc};

/// Interview scheduled for an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrevista {
  pub id: String,
  pub postulacion_id: String,
  pub fecha: String,
  pub entrevistador: String,
  #[serde(default)]
  pub modalidad: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrevistaDraft {
  pub postulacion_id: String,
  pub fecha: String,
  pub entrevistador: String,
  pub modalidad: Option<String>,
}

impl Validate for EntrevistaDraft {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("postulacionId", &self.postulacion_id)?;
    require_non_empty("fecha", &self.fecha)?;
    require_non_empty("entrevistador", &self.entrevistador)
  }
}

impl Entity for Entrevista {
  type Draft = EntrevistaDraft;

  const LABEL: &'static str = "entrevista";

  const DOCUMENTS: EntityDocuments = EntityDocuments {
    list: OperationDoc {
      name: "entrevistas",
      document: r#"query entrevistas {
  entrevistas { id postulacionId fecha entrevistador modalidad }
}"#,
    },
    create: OperationDoc {
      name: "createEntrevista",
      document: r#"mutation createEntrevista($input: EntrevistaInput!) {
  createEntrevista(input: $input) { id postulacionId fecha entrevistador modalidad }
}"#,
    },
    update: OperationDoc {
      name: "updateEntrevista",
      document: r#"mutation updateEntrevista($id: ID!, $input: EntrevistaInput!) {
  updateEntrevista(id: $id, input: $input) { id postulacionId fecha entrevistador modalidad }
}"#,
    },
    delete: OperationDoc {
      name: "deleteEntrevista",
      document: r#"mutation deleteEntrevista($id: ID!) {
  deleteEntrevista(id: $id)
}"#,
    },
  };

  fn id(&self) -> &str {
    &self.id
  }
}
