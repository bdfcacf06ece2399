use serde::{Deserialize, Serialize};

use crate::graphql::ValidationError;
use crate::hook::validate::{require_non_empty, require_positive, Validate};
use crate::hook::{Entity, EntityDocuments, OperationDoc};

/// Job offer published by a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfertaTrabajo {
  pub id: String,
  pub titulo: String,
  #[serde(default)]
  pub descripcion: String,
  pub salario: f64,
  #[serde(default)]
  pub estado: Option<String>,
  pub empresa_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfertaTrabajoDraft {
  pub titulo: String,
  pub descripcion: String,
  pub salario: f64,
  pub estado: Option<String>,
  pub empresa_id: String,
}

impl Validate for OfertaTrabajoDraft {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("titulo", &self.titulo)?;
    require_positive("salario", self.salario)?;
    require_non_empty("empresaId", &self.empresa_id)
  }
}

impl Entity for OfertaTrabajo {
  type Draft = OfertaTrabajoDraft;

  const LABEL: &'static str = "oferta de trabajo";

  const DOCUMENTS: EntityDocuments = EntityDocuments {
    list: OperationDoc {
      name: "ofertasTrabajo",
      document: r#"query ofertasTrabajo {
  ofertasTrabajo { id titulo descripcion salario estado empresaId }
}"#,
    },
    create: OperationDoc {
      name: "createOfertaTrabajo",
      document: r#"mutation createOfertaTrabajo($input: OfertaTrabajoInput!) {
  createOfertaTrabajo(input: $input) { id titulo descripcion salario estado empresaId }
}"#,
    },
    update: OperationDoc {
      name: "updateOfertaTrabajo",
      document: r#"mutation updateOfertaTrabajo($id: ID!, $input: OfertaTrabajoInput!) {
  updateOfertaTrabajo(id: $id, input: $input) { id titulo descripcion salario estado empresaId }
}"#,
    },
    delete: OperationDoc {
      name: "deleteOfertaTrabajo",
      document: r#"mutation deleteOfertaTrabajo($id: ID!) {
  deleteOfertaTrabajo(id: $id)
}"#,
    },
  };

  fn id(&self) -> &str {
    &self.id
  }
}
