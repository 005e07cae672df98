// ==========================================
// Campus Administration Platform - Academic Year Derivation
// ==========================================
// The academic year is never stored: it is derived from a student's
// enrollment batch and the current calendar year. Pure arithmetic,
// no state.
// ==========================================

/// Ordinal year-of-study label: 1 -> "1st Year", 2 -> "2nd Year",
/// 3 -> "3rd Year", anything else -> "{n}th Year".
///
/// Out-of-range ordinals (0, negative) are rendered, not rejected:
/// a future-dated batch is a display concern, upstream validation is
/// the caller's business.
pub fn ordinal_label(year_of_study: i32) -> String {
    match year_of_study {
        1 => "1st Year".to_string(),
        2 => "2nd Year".to_string(),
        3 => "3rd Year".to_string(),
        n => format!("{}th Year", n),
    }
}

/// Derive the academic-year label from an enrollment batch.
///
/// `year_of_study = current_year - batch_year`: a 2024 batch is in its
/// 1st year through calendar 2025. Returns None only when `batch` is
/// not a year at all (non-numeric).
pub fn academic_year_label(batch: &str, current_year: i32) -> Option<String> {
    let batch_year: i32 = batch.trim().parse().ok()?;
    Some(ordinal_label(current_year - batch_year))
}

/// Inverse derivation: the enrollment batch that is in `year_of_study`
/// during `current_year`. Used to turn a label-keyed request into a
/// roster query.
pub fn batch_for_year(year_of_study: u32, current_year: i32) -> String {
    (current_year - year_of_study as i32).to_string()
}

/// Parse an ordinal label back into a year of study:
/// "1st Year" -> 1, "3rd Year" -> 3, "10th Year" -> 10.
pub fn parse_year_of_study(label: &str) -> Option<u32> {
    let trimmed = label.trim().strip_suffix("Year")?.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    // must be digits followed by exactly an ordinal suffix
    let suffix = &trimmed[digits.len()..];
    if !matches!(suffix, "st" | "nd" | "rd" | "th") {
        return None;
    }
    digits.parse().ok()
}
