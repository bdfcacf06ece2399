use serde::{Deserialize, Serialize};

use crate::graphql::ValidationError;
use crate::hook::validate::{require_email, require_non_empty, Validate};
use crate::hook::{Entity, EntityDocuments, OperationDoc};

/// Company registered in the ERP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Empresa {
  pub id: String,
  pub nombre: String,
  pub correo: String,
  pub rubro: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmpresaDraft {
  pub nombre: String,
  pub correo: String,
  pub rubro: String,
}

impl Validate for EmpresaDraft {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("nombre", &self.nombre)?;
    require_email("correo", &self.correo)?;
    require_non_empty("rubro", &self.rubro)
  }
}

impl Entity for Empresa {
  type Draft = EmpresaDraft;

  const LABEL: &'static str = "empresa";

  const DOCUMENTS: EntityDocuments = EntityDocuments {
    list: OperationDoc {
      name: "empresas",
      document: r#"query empresas {
  empresas { id nombre correo rubro }
}"#,
    },
    create: OperationDoc {
      name: "createEmpresa",
      document: r#"mutation createEmpresa($input: EmpresaInput!) {
  createEmpresa(input: $input) { id nombre correo rubro }
}"#,
    },
    update: OperationDoc {
      name: "updateEmpresa",
      document: r#"mutation updateEmpresa($id: ID!, $input: EmpresaInput!) {
  updateEmpresa(id: $id, input: $input) { id nombre correo rubro }
}"#,
    },
    delete: OperationDoc {
      name: "deleteEmpresa",
      document: r#"mutation deleteEmpresa($id: ID!) {
  deleteEmpresa(id: $id)
}"#,
    },
  };

  fn id(&self) -> &str {
    &self.id
  }
}
