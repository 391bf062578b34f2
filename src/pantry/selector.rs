use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::category::{classify, contains_any, leading_token, FoodCategory};

/// Markers that make a dairy item worth adding (egg or cottage-cheese dishes).
const DAIRY_PAIRING_MARKERS: &[&str] = &["яйц", "творог"];

#[derive(Debug, Default)]
struct CategoryBuckets {
    proteins: Vec<usize>,
    vegetables: Vec<usize>,
    starches: Vec<usize>,
    dairy: Vec<usize>,
}

impl CategoryBuckets {
    fn from_pantry(pantry: &[String]) -> Self {
        let mut buckets = Self::default();
        for (idx, entry) in pantry.iter().enumerate() {
            match classify(entry) {
                FoodCategory::Protein => buckets.proteins.push(idx),
                FoodCategory::Vegetable => buckets.vegetables.push(idx),
                FoodCategory::Starch => buckets.starches.push(idx),
                FoodCategory::Dairy => buckets.dairy.push(idx),
                FoodCategory::Other => {}
            }
        }
        buckets
    }
}

/// Picks a dish-sized subset of the pantry: one protein, one or two vegetables,
/// a starch when there is a protein, a dairy item for egg/curd dishes, and one
/// extra vegetable when fewer than two items were picked.
///
/// Entries are returned verbatim (quantity text included) in selection order.
/// Buckets hold indices into `pantry`, so duplicated entries stay independent
/// and no pantry position is ever selected twice.
pub fn select_ingredients<R: Rng + ?Sized>(pantry: &[String], rng: &mut R) -> Vec<String> {
    let buckets = CategoryBuckets::from_pantry(pantry);
    debug!(
        proteins = buckets.proteins.len(),
        vegetables = buckets.vegetables.len(),
        starches = buckets.starches.len(),
        dairy = buckets.dairy.len(),
        "grouped pantry entries"
    );

    let mut selected: Vec<usize> = Vec::new();

    let protein = buckets.proteins.choose(rng).copied();
    if let Some(idx) = protein {
        selected.push(idx);
    }

    let veggie_count = buckets.vegetables.len().min(2);
    selected.extend(buckets.vegetables.choose_multiple(rng, veggie_count).copied());

    if protein.is_some() {
        if let Some(&idx) = buckets.starches.choose(rng) {
            selected.push(idx);
        }
    }

    let wants_dairy = selected
        .iter()
        .any(|&idx| contains_any(&leading_token(&pantry[idx]), DAIRY_PAIRING_MARKERS));
    if wants_dairy {
        if let Some(&idx) = buckets.dairy.choose(rng) {
            selected.push(idx);
        }
    }

    if selected.len() < 2 {
        let unused: Vec<usize> = buckets
            .vegetables
            .iter()
            .copied()
            .filter(|idx| !selected.contains(idx))
            .collect();
        if let Some(&idx) = unused.choose(rng) {
            selected.push(idx);
        }
    }

    let chosen: Vec<String> = selected.into_iter().map(|idx| pantry[idx].clone()).collect();
    debug!(?chosen, "selected ingredients");
    chosen
}
