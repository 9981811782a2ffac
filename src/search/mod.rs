//! Retrieval and ranking over the transcript store.

pub mod aggregate;
pub mod local;
pub mod retriever;
pub mod store;
pub mod supabase;

/// Stages of one search request, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Classifying,
    Expanding,
    Retrieving,
    Aggregating,
}

impl std::fmt::Display for SearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SearchStage::Classifying => "classifying",
            SearchStage::Expanding => "expanding",
            SearchStage::Retrieving => "retrieving",
            SearchStage::Aggregating => "aggregating",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_for_log_fields() {
        let names: Vec<String> = [
            SearchStage::Classifying,
            SearchStage::Expanding,
            SearchStage::Retrieving,
            SearchStage::Aggregating,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(names, ["classifying", "expanding", "retrieving", "aggregating"]);
    }
}
