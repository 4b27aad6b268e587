//! Category Detector — scores resume text against catalog categories by
//! role-name and skill occurrence to find the best-matching industry.

use crate::catalog::Catalog;

/// Role-name hit = 3 points, catalog-skill hit = 1 point, both via
/// case-insensitive substring match. Scores accumulate per category in
/// catalog iteration order and the first maximum wins; an all-zero score
/// board yields "General".
pub fn detect_category(text: &str, catalog: &Catalog) -> String {
    let text_lower = text.to_lowercase();

    // Ordered score board: first-seen category order breaks ties.
    let mut scores: Vec<(&str, u32)> = Vec::new();

    for role in catalog.iter() {
        let mut points = 0;
        if text_lower.contains(&role.name.to_lowercase()) {
            points += 3;
        }
        for skill in &role.skills {
            if text_lower.contains(&skill.to_lowercase()) {
                points += 1;
            }
        }

        match scores.iter_mut().find(|(cat, _)| *cat == role.category) {
            Some((_, total)) => *total += points,
            None => scores.push((role.category.as_str(), points)),
        }
    }

    // Strict comparison keeps the first maximum on ties.
    let mut best: Option<(&str, u32)> = None;
    for (category, points) in &scores {
        if best.map_or(true, |(_, top)| *points > top) {
            best = Some((category, *points));
        }
    }

    match best {
        Some((category, points)) if points > 0 => category.to_string(),
        _ => "General".to_string(),
    }
}
