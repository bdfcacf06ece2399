use serde::{Deserialize, Serialize};

use crate::graphql::ValidationError;
use crate::hook::validate::{require_email, require_non_empty, Validate};
use crate::hook::{Entity, EntityDocuments, OperationDoc};

/// A candidate's application to a job offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Postulacion {
  pub id: String,
  pub candidato: String,
  pub correo: String,
  pub oferta_id: String,
  #[serde(default)]
  pub estado: String,
  #[serde(default)]
  pub fecha_postulacion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostulacionDraft {
  pub candidato: String,
  pub correo: String,
  pub oferta_id: String,
  pub estado: String,
}

impl Validate for PostulacionDraft {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("candidato", &self.candidato)?;
    require_email("correo", &self.correo)?;
    require_non_empty("ofertaId", &self.oferta_id)?;
    require_non_empty("estado", &self.estado)
  }
}

impl Entity for Postulacion {
  type Draft = PostulacionDraft;

  const LABEL: &'static str = "postulacion";

  const DOCUMENTS: EntityDocuments = EntityDocuments {
    list: OperationDoc {
      name: "postulaciones",
      document: r#"query postulaciones {
  postulaciones { id candidato correo ofertaId estado fechaPostulacion }
}"#,
    },
    create: OperationDoc {
      name: "createPostulacion",
      document: r#"mutation createPostulacion($input: PostulacionInput!) {
  createPostulacion(input: $input) { id candidato correo ofertaId estado fechaPostulacion }
}"#,
    },
    update: OperationDoc {
      name: "updatePostulacion",
      document: r#"mutation updatePostulacion($id: ID!, $input: PostulacionInput!) {
  updatePostulacion(id: $id, input: $input) { id candidato correo ofertaId estado fechaPostulacion }
}"#,
    },
    delete: OperationDoc {
      name: "deletePostulacion",
      document: r#"mutation deletePostulacion($id: ID!) {
  deletePostulacion(id: $id)
}"#,
    },
  };

  fn id(&self) -> &str {
    &self.id
  }
}
