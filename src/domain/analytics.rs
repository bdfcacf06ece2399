//! Read-only analytics served by the BI and ML services behind the gateway.
//!
//! Values are displayed as received; nothing here computes a metric.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::CacheLayer;
use crate::graphql::{extract_field, DataError, Operation, QueryExecutor};
use crate::hook::OperationDoc;

pub const CLUSTERS: OperationDoc = OperationDoc {
  name: "clusters",
  document: r#"query clusters {
  clusters { id nombre totalCandidatos silueta habilidadesClave }
}"#,
};

pub const CLUSTER_CANDIDATES: OperationDoc = OperationDoc {
  name: "candidatosCluster",
  document: r#"query candidatosCluster($clusterId: Int!) {
  candidatosCluster(clusterId: $clusterId) { id nombre puntaje }
}"#,
};

pub const CANDIDATE_DETAIL: OperationDoc = OperationDoc {
  name: "candidatoDetalle",
  document: r#"query candidatoDetalle($id: ID!) {
  candidatoDetalle(id: $id) {
    id nombre correo clusterId habilidades postulaciones entrevistas promedioEvaluacion
  }
}"#,
};

pub const ENTREPRENEUR_KPIS: OperationDoc = OperationDoc {
  name: "kpisEmprendedor",
  document: r#"query kpisEmprendedor($busqueda: String!) {
  kpisEmprendedor(busqueda: $busqueda) {
    empresa ofertasActivas postulaciones entrevistas tasaConversion
    candidatos { id nombre detalle }
    entrevistadores { id nombre detalle }
  }
}"#,
};

pub const INTERVIEWER_DETAIL: OperationDoc = OperationDoc {
  name: "entrevistadorDetalle",
  document: r#"query entrevistadorDetalle($id: ID!) {
  entrevistadorDetalle(id: $id) { id nombre entrevistasRealizadas promedioCalificacion empresas }
}"#,
};

/// Candidate cluster produced by the ML service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
  pub id: i64,
  pub nombre: String,
  pub total_candidatos: u32,
  #[serde(default)]
  pub silueta: Option<f64>,
  #[serde(default)]
  pub habilidades_clave: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCandidate {
  pub id: String,
  pub nombre: String,
  #[serde(default)]
  pub puntaje: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDetail {
  pub id: String,
  pub nombre: String,
  #[serde(default)]
  pub correo: Option<String>,
  #[serde(default)]
  pub cluster_id: Option<i64>,
  #[serde(default)]
  pub habilidades: Vec<String>,
  #[serde(default)]
  pub postulaciones: u32,
  #[serde(default)]
  pub entrevistas: u32,
  #[serde(default)]
  pub promedio_evaluacion: Option<f64>,
}

/// Person listed in a KPI report, used as a drill-down target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
  pub id: String,
  pub nombre: String,
  #[serde(default)]
  pub detalle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiReport {
  pub empresa: String,
  pub ofertas_activas: u32,
  pub postulaciones: u32,
  pub entrevistas: u32,
  /// Ratio in [0, 1] as reported by the BI service
  pub tasa_conversion: f64,
  #[serde(default)]
  pub candidatos: Vec<PersonRef>,
  #[serde(default)]
  pub entrevistadores: Vec<PersonRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewerDetail {
  pub id: String,
  pub nombre: String,
  #[serde(default)]
  pub entrevistas_realizadas: u32,
  #[serde(default)]
  pub promedio_calificacion: Option<f64>,
  #[serde(default)]
  pub empresas: Vec<String>,
}

/// Cached reads for the analytics screens.
#[derive(Clone)]
pub struct AnalyticsClient {
  executor: QueryExecutor,
  layer: CacheLayer,
}

impl AnalyticsClient {
  pub fn new(executor: QueryExecutor, layer: CacheLayer) -> Self {
    Self { executor, layer }
  }

  pub async fn clusters(&self) -> Result<Vec<Cluster>, DataError> {
    let found = self.read(query(CLUSTERS)).await?;
    Ok(found.unwrap_or_default())
  }

  pub async fn cluster_candidates(
    &self,
    cluster_id: i64,
  ) -> Result<Vec<ClusterCandidate>, DataError> {
    let found = self
      .read(query(CLUSTER_CANDIDATES).var("clusterId", cluster_id))
      .await?;
    Ok(found.unwrap_or_default())
  }

  /// `None` when the candidate does not exist.
  pub async fn candidate(&self, id: &str) -> Result<Option<CandidateDetail>, DataError> {
    self.read(query(CANDIDATE_DETAIL).var("id", id)).await
  }

  pub async fn entrepreneur_kpis(&self, search: &str) -> Result<Option<KpiReport>, DataError> {
    self
      .read(query(ENTREPRENEUR_KPIS).var("busqueda", search.trim()))
      .await
  }

  pub async fn interviewer(&self, id: &str) -> Result<Option<InterviewerDetail>, DataError> {
    self.read(query(INTERVIEWER_DETAIL).var("id", id)).await
  }

  /// Drop cached results of one query, whatever its variables.
  pub fn invalidate(&self, doc: OperationDoc) -> usize {
    self.layer.cache().invalidate(doc.name)
  }

  async fn read<T: DeserializeOwned>(&self, operation: Operation) -> Result<Option<T>, DataError> {
    let executor = self.executor.clone();
    let request = operation.clone();
    let fetched = self
      .layer
      .fetch(&operation, move || async move { executor.execute(&request).await })
      .await?;
    extract_field(&fetched.data, operation.name())
  }
}

fn query(doc: OperationDoc) -> Operation {
  Operation::query(doc.name, doc.document)
}
