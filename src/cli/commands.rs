use crate::assistant::AssistantReply;
use crate::corpus::ImportReport;
use crate::db::{self, DbPool};
use crate::dietary::TaggingReport;
use crate::ranking::RankedRecipe;
use crate::utils::sanitize::truncate;
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};

const SAMPLE_RECIPES: usize = 5;

/// Printed when `tag` is run without --dry or --write
pub fn print_tagging_guidance() {
    println!("No changes made. Choose a mode:");
    println!("  cookmate tag --dry     Report which \"-free\" tags would be added");
    println!("  cookmate tag --write   Add the missing tags (alias: --force)");
}

pub fn print_tagging_report(report: &TaggingReport) {
    let verb = match report.mode {
        crate::dietary::TaggingMode::Apply => "added",
        _ => "to add",
    };

    println!("\u{2713} Scanned {} recipes", report.scanned);
    println!("  Recipes needing tags: {}", report.recipes_planned);
    println!("  Tags {}: {}", verb, report.tags_added);

    if !report.samples.is_empty() {
        println!("  Samples:");
        for sample in &report.samples {
            println!(
                "    #{} {}: +{}",
                sample.id,
                truncate(&sample.title, 50),
                sample.add.join(", +")
            );
        }
    }
}

pub fn print_import_report(report: &ImportReport) {
    println!("\u{2713} Imported {} recipes", report.imported);
    println!("  Duplicates skipped: {}", report.duplicates);
    println!("  Invalid entries skipped: {}", report.skipped);
}

/// Match a tag regardless of the separator between its words:
/// "gluten-free" also finds "gluten free" and "glutenfree"
pub fn tag_pattern(tag: &str) -> Result<Regex> {
    let parts: Vec<String> = tag
        .trim()
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(regex::escape)
        .collect();

    if parts.is_empty() {
        return Err(Error::Validation("Tag must not be empty".to_string()));
    }

    RegexBuilder::new(&format!("^{}$", parts.join(r"[-\s]?")))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Validation(format!("Invalid tag: {e}")))
}

/// Print tag usage and, with `tag`, a few recipes carrying it
pub async fn check_tags(pool: &DbPool, tag: Option<&str>) -> Result<()> {
    let counts = db::tags::get_tags_with_count(pool).await?;

    if counts.is_empty() {
        println!("No tags in use");
    } else {
        println!("\n{} distinct tags:\n", counts.len());
        println!("{:<30} {:>8}", "Tag", "Recipes");
        println!("{}", "-".repeat(39));
        for (name, count) in &counts {
            println!("{:<30} {:>8}", truncate(name, 30), count);
        }
    }

    if let Some(tag) = tag {
        let pattern = tag_pattern(tag)?;
        let recipes = db::tags::recipes_with_tag_matching(pool, &pattern, SAMPLE_RECIPES).await?;

        println!();
        if recipes.is_empty() {
            println!("No recipes tagged \"{tag}\"");
        } else {
            println!("Recipes tagged \"{tag}\":");
            for (id, title) in recipes {
                println!("  #{id} {title}");
            }
        }
    }

    Ok(())
}

pub fn print_reply(reply: &AssistantReply) {
    println!("{}", reply.reply);
    println!("  (tier: {})\n", reply.tier);

    if reply.suggestions.is_empty() {
        println!("No recipes found");
        return;
    }

    println!("{:<5} {:<50} {:<8} {:<6}", "ID", "Title", "Level", "Mins");
    println!("{}", "-".repeat(72));
    for card in &reply.suggestions {
        println!(
            "{:<5} {:<50} {:<8} {:<6}",
            card.id,
            truncate(&card.title, 50),
            card.difficulty.as_str(),
            card.prep_time_min
        );
    }
}

pub fn print_matches(results: &[RankedRecipe]) {
    if results.is_empty() {
        println!("No recipes found");
        return;
    }

    println!("{:<5} {:<50} {:>8}", "ID", "Title", "Score");
    println!("{}", "-".repeat(65));
    for recipe in results {
        println!(
            "{:<5} {:<50} {:>8.3}",
            recipe.id,
            truncate(&recipe.title, 50),
            recipe.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_pattern_ignores_separators() {
        let pattern = tag_pattern("gluten-free").unwrap();
        assert!(pattern.is_match("gluten-free"));
        assert!(pattern.is_match("Gluten Free"));
        assert!(pattern.is_match("glutenfree"));
        assert!(!pattern.is_match("not gluten-free"));
        assert!(!pattern.is_match("gluten-free-ish"));
    }

    #[test]
    fn test_tag_pattern_escapes_input() {
        let pattern = tag_pattern("c++").unwrap();
        assert!(pattern.is_match("c++"));
        assert!(!pattern.is_match("ccc"));

        assert!(matches!(tag_pattern(" - "), Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_check_tags_runs_on_store() {
        let pool = db::memory_pool().await.unwrap();
        let recipe = db::recipes::tests::new_recipe("Rice Bowl", &["rice"], &["gluten free"]);
        db::recipes::insert_recipe(&pool, &recipe).await.unwrap();

        check_tags(&pool, Some("gluten-free")).await.unwrap();
        check_tags(&pool, None).await.unwrap();
    }
}
