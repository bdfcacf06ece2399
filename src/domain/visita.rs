use serde::{Deserialize, Serialize};

use crate::graphql::ValidationError;
use crate::hook::validate::{require_non_empty, Validate};
use crate::hook::{Entity, EntityDocuments, OperationDoc};

/// One recorded page view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visita {
  pub id: String,
  pub pagina: String,
  #[serde(default)]
  pub usuario: Option<String>,
  pub fecha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitaDraft {
  pub pagina: String,
  pub usuario: Option<String>,
}

impl Validate for VisitaDraft {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("pagina", &self.pagina)
  }
}

impl Entity for Visita {
  type Draft = VisitaDraft;

  const LABEL: &'static str = "visita";

  const DOCUMENTS: EntityDocuments = EntityDocuments {
    list: OperationDoc {
      name: "visitas",
      document: r#"query visitas {
  visitas { id pagina usuario fecha }
}"#,
    },
    create: OperationDoc {
      name: "createVisita",
      document: r#"mutation createVisita($input: VisitaInput!) {
  createVisita(input: $input) { id pagina usuario fecha }
}"#,
    },
    update: OperationDoc {
      name: "updateVisita",
      document: r#"mutation updateVisita($id: ID!, $input: VisitaInput!) {
  updateVisita(id: $id, input: $input) { id pagina usuario fecha }
}"#,
    },
    delete: OperationDoc {
      name: "deleteVisita",
      document: r#"mutation deleteVisita($id: ID!) {
  deleteVisita(id: $id)
}"#,
    },
  };

  fn id(&self) -> &str {
    &self.id
  }
}
