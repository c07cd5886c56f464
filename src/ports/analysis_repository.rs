//! Analysis history storage port trait.

use uuid::Uuid;

use crate::domain::analysis_history::AnalysisRecord;
use crate::domain::chart_analysis::ChartAnalysis;
use crate::domain::error::SignaldeskError;

pub trait AnalysisRepository {
    fn save(&self, user_id: &str, analysis: ChartAnalysis) -> Result<AnalysisRecord, SignaldeskError>;

    /// Newest first, at most `limit` records.
    fn list_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<AnalysisRecord>, SignaldeskError>;

    fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, SignaldeskError>;

    /// `NotFound` when no record has this id.
    fn delete(&self, id: Uuid) -> Result<(), SignaldeskError>;
}
