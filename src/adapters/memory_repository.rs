//! In-memory analysis history.

use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::analysis_history::AnalysisRecord;
use crate::domain::chart_analysis::ChartAnalysis;
use crate::domain::error::SignaldeskError;
use crate::ports::analysis_repository::AnalysisRepository;

/// Records kept in insertion order; lost on restart.
#[derive(Default)]
pub struct InMemoryAnalysisRepository {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> SignaldeskError {
    SignaldeskError::Storage {
        reason: "analysis store lock poisoned".to_string(),
    }
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn save(&self, user_id: &str, analysis: ChartAnalysis) -> Result<AnalysisRecord, SignaldeskError> {
        let record = AnalysisRecord::new(user_id, analysis, Utc::now());
        self.records.write().map_err(poisoned)?.push(record.clone());
        tracing::debug!(id = %record.id, user_id, "saved analysis");
        Ok(record)
    }

    fn list_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<AnalysisRecord>, SignaldeskError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, SignaldeskError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    fn delete(&self, id: Uuid) -> Result<(), SignaldeskError> {
        let mut records = self.records.write().map_err(poisoned)?;
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SignaldeskError::NotFound {
                what: format!("analysis {}", id),
            })?;
        records.remove(index);
        Ok(())
    }
}
