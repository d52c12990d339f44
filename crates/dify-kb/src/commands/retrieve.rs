//! Retrieve command - search a dataset.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use dify_kb_client::{RetrievalModel, RetrieveRequest, SearchMethod};

use super::{Context, SearchArg, print_empty, print_header, print_json, truncate};

/// Arguments for the retrieve command.
#[derive(Args, Debug)]
pub struct RetrieveArgs {
    /// Dataset ID
    pub dataset: String,

    /// Query text
    pub query: String,

    /// Maximum results to return
    #[arg(short = 'k', long)]
    pub top_k: Option<u32>,

    /// Drop results scoring below this (0.0 - 1.0)
    #[arg(long)]
    pub score_threshold: Option<f32>,

    /// Search method (default: the dataset's setting)
    #[arg(long, value_enum)]
    pub search_method: Option<SearchArg>,
}

impl RetrieveArgs {
    fn to_request(&self) -> RetrieveRequest {
        let request = RetrieveRequest::new(&self.query);
        if self.top_k.is_none() && self.score_threshold.is_none() && self.search_method.is_none()
        {
            return request;
        }

        let method = self
            .search_method
            .map(SearchMethod::from)
            .unwrap_or(SearchMethod::SemanticSearch);
        let mut model = RetrievalModel::new(method);
        if let Some(top_k) = self.top_k {
            model = model.with_top_k(top_k);
        }
        if let Some(threshold) = self.score_threshold {
            model = model.with_score_threshold(threshold);
        }
        request.with_retrieval_model(model)
    }
}

/// Run the retrieve command.
pub async fn run(args: RetrieveArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();

    if ctx.verbose && !ctx.json_output {
        println!(
            "{}",
            dim.apply_to(format!("Searching {}: \"{}\"", args.dataset, args.query))
        );
        println!();
    }

    let response = client
        .datasets()
        .retrieve(&args.dataset, args.to_request())
        .await?;
    if ctx.json_output {
        return print_json(&response);
    }

    print_header("Retrieval Results");
    if response.records.is_empty() {
        print_empty("results");
        return Ok(());
    }

    for (i, record) in response.records.iter().enumerate() {
        let score = record
            .score
            .map(|s| format!("(score: {:.3})", s))
            .unwrap_or_default();
        let source = record
            .segment
            .document
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or("-");
        println!(
            "{}. {}",
            style(i + 1).cyan(),
            truncate(&record.segment.segment.content, 70)
        );
        println!("   {} {}", dim.apply_to(score), dim.apply_to(source));
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(top_k: Option<u32>, search_method: Option<SearchArg>) -> RetrieveArgs {
        RetrieveArgs {
            dataset: "ds-1".to_string(),
            query: "hello".to_string(),
            top_k,
            score_threshold: None,
            search_method,
        }
    }

    #[test]
    fn test_bare_query_uses_dataset_defaults() {
        assert!(args(None, None).to_request().retrieval_model.is_none());
    }

    #[test]
    fn test_flags_build_retrieval_model() {
        let request = args(Some(5), Some(SearchArg::Hybrid)).to_request();
        let model = request.retrieval_model.unwrap();
        assert_eq!(model.top_k, Some(5));
        assert_eq!(model.search_method, Some(SearchMethod::HybridSearch));
    }
}
