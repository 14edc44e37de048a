use crate::db::{self, DbPool};
use crate::dietary::{classifier, lexicon::DietaryLexicon};
use crate::error::{Error, Result};
use serde::Serialize;
use tracing::{debug, info};

const PROGRESS_INTERVAL: usize = 200;
const MAX_SAMPLES: usize = 5;

/// How a tagging run treats the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaggingMode {
    /// Print usage guidance and touch nothing
    Guidance,
    /// Plan and report without writing
    DryRun,
    /// Plan and write
    Apply,
}

impl TaggingMode {
    /// `write` wins when both flags are given
    pub fn from_flags(dry: bool, write: bool) -> Self {
        match (dry, write) {
            (_, true) => TaggingMode::Apply,
            (true, false) => TaggingMode::DryRun,
            (false, false) => TaggingMode::Guidance,
        }
    }
}

/// One planned change, kept for the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggingSample {
    pub id: i64,
    pub title: String,
    pub add: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggingReport {
    pub mode: TaggingMode,
    pub scanned: usize,
    /// Recipes with at least one missing tag
    pub recipes_planned: usize,
    /// Tag links planned (dry run) or written (apply)
    pub tags_added: u64,
    pub samples: Vec<TaggingSample>,
}

impl TaggingReport {
    fn new(mode: TaggingMode) -> Self {
        Self {
            mode,
            scanned: 0,
            recipes_planned: 0,
            tags_added: 0,
            samples: Vec::new(),
        }
    }
}

/// Walk the whole store in pages and add every "-free" tag a recipe
/// qualifies for but lacks. Tags are only ever added, so a second run
/// finds nothing to do.
pub async fn run(
    pool: &DbPool,
    lexicon: &DietaryLexicon,
    mode: TaggingMode,
    batch_size: usize,
) -> Result<TaggingReport> {
    let mut report = TaggingReport::new(mode);

    if mode == TaggingMode::Guidance {
        return Ok(report);
    }

    if batch_size == 0 {
        return Err(Error::Config("Tagging batch size must be non-zero".to_string()));
    }

    info!("Starting dietary tagging ({:?}, batch size {})", mode, batch_size);

    let mut last_id = 0;

    loop {
        let page = db::recipes::fetch_documents_after(pool, last_id, batch_size).await?;
        if page.is_empty() {
            break;
        }

        let page_len = page.len();
        let mut planned: Vec<(i64, Vec<String>)> = Vec::new();

        for (id, doc) in page {
            last_id = id;
            report.scanned += 1;

            let add = classifier::missing_tags(&doc, lexicon);
            if !add.is_empty() {
                report.recipes_planned += 1;
                if report.samples.len() < MAX_SAMPLES {
                    report.samples.push(TaggingSample {
                        id,
                        title: doc.title.clone(),
                        add: add.clone(),
                    });
                }
                planned.push((id, add));
            }

            if report.scanned % PROGRESS_INTERVAL == 0 {
                info!("Scanned {} recipes", report.scanned);
            }
        }

        match mode {
            TaggingMode::Apply => {
                let mut tx = pool.begin().await?;
                for (id, add) in &planned {
                    report.tags_added += db::tags::add_recipe_tags_with(&mut tx, *id, add).await?;
                }
                tx.commit().await?;
            }
            _ => {
                report.tags_added += planned.iter().map(|(_, add)| add.len() as u64).sum::<u64>();
            }
        }

        debug!(
            "Tagging page done: {} recipes, {} planned (last id {})",
            page_len,
            planned.len(),
            last_id
        );

        if page_len < batch_size {
            break;
        }
    }

    info!(
        "Dietary tagging complete: {} scanned, {} recipes planned, {} tags added",
        report.scanned, report.recipes_planned, report.tags_added
    );

    Ok(report)
}
