mod clusters;
mod entity_list;
mod kpis;
pub mod records;

pub use clusters::ClusterExplorerView;
pub use entity_list::EntityListView;
pub use kpis::KpiExplorerView;
