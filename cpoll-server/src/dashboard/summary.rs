//! Summary statistics and chart data
//!
//! Always computed over the full unfiltered record set.

use cpoll_common::models::KnowledgeQuestion;
use cpoll_common::ResponseRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Yes/no tally for one knowledge question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub field: &'static str,
    pub label: &'static str,
    pub yes_count: usize,
    /// total - yes_count; anything other than "Yes" counts here
    pub no_count: usize,
    /// One decimal place; 0 when there are no records
    pub yes_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total: usize,
    /// One entry per knowledge question, display order
    pub questions: Vec<QuestionSummary>,
    pub by_age: BTreeMap<String, usize>,
    pub by_gender: BTreeMap<String, usize>,
}

impl SummaryStatistics {
    pub fn compute(records: &[ResponseRecord]) -> Self {
        let total = records.len();

        let questions = KnowledgeQuestion::ALL
            .into_iter()
            .map(|question| {
                let yes_count = records
                    .iter()
                    .filter(|r| r.answer(question) == "Yes")
                    .count();
                QuestionSummary {
                    field: question.field(),
                    label: question.label(),
                    yes_count,
                    no_count: total - yes_count,
                    yes_percentage: percentage(yes_count, total),
                }
            })
            .collect();

        let mut by_age = BTreeMap::new();
        let mut by_gender = BTreeMap::new();
        for record in records {
            *by_age.entry(record.age.clone()).or_insert(0) += 1;
            *by_gender.entry(record.gender.clone()).or_insert(0) += 1;
        }

        Self {
            total,
            questions,
            by_age,
            by_gender,
        }
    }

    pub fn question(&self, question: KnowledgeQuestion) -> Option<&QuestionSummary> {
        self.questions.iter().find(|q| q.field == question.field())
    }

    pub fn chart(&self) -> ChartData {
        ChartData {
            labels: self.questions.iter().map(|q| q.label).collect(),
            datasets: vec![
                ChartDataset {
                    label: "Yes",
                    data: self.questions.iter().map(|q| q.yes_count).collect(),
                },
                ChartDataset {
                    label: "No",
                    data: self.questions.iter().map(|q| q.no_count).collect(),
                },
            ],
        }
    }
}

/// `part / total * 100` rounded to one decimal
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Bar chart series: one label per question, Yes and No datasets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub labels: Vec<&'static str>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartDataset {
    pub label: &'static str,
    pub data: Vec<usize>,
}
