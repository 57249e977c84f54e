use miru_types::{Observation, RecognitionRecord, TextFragment};
use unicode_normalization::UnicodeNormalization;

/// Minimum row band height when grouping fragments into lines. Bounding
/// boxes from real engines jitter by a few pixels between frames.
const MIN_ROW_TOLERANCE: f32 = 8.0;

/// Canonicalize one recognition record into an observation.
///
/// Fragments are concatenated in reading order (rows top-to-bottom, then
/// left-to-right within a row), NFKC-normalized so full-width/half-width
/// variants compare equal, and whitespace-collapsed. A record whose
/// fragments were all filtered out yields an empty-text observation,
/// which is a real observation of "no text here".
pub fn normalize(record: &RecognitionRecord) -> Observation {
    let ordered = reading_order(&record.fragments);

    let joined = ordered
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let confidence = if ordered.is_empty() {
        0.0
    } else {
        ordered.iter().map(|f| f.confidence).sum::<f32>() / ordered.len() as f32
    };

    Observation {
        region: record.region.clone(),
        text: canonicalize(&joined),
        confidence,
        observed_at: record.captured_at,
    }
}

/// NFKC + whitespace collapse. Stable under cosmetic OCR variance.
pub fn canonicalize(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sort fragments into reading order by grouping them into rows on bbox
/// y-centers, then ordering each row left-to-right. Deterministic for any
/// input ordering of the same fragments.
fn reading_order(fragments: &[TextFragment]) -> Vec<&TextFragment> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let mean_height =
        fragments.iter().map(|f| f.bbox.height as f32).sum::<f32>() / fragments.len() as f32;
    let tolerance = (mean_height / 2.0).max(MIN_ROW_TOLERANCE);

    struct Row<'a> {
        center_y: f32,
        items: Vec<&'a TextFragment>,
    }

    let mut by_y: Vec<&TextFragment> = fragments.iter().collect();
    by_y.sort_by(|a, b| {
        a.bbox
            .center_y()
            .total_cmp(&b.bbox.center_y())
            .then(a.bbox.x.cmp(&b.bbox.x))
    });

    let mut rows: Vec<Row> = Vec::new();
    for fragment in by_y {
        let center = fragment.bbox.center_y();
        match rows
            .iter_mut()
            .find(|row| (row.center_y - center).abs() <= tolerance)
        {
            Some(row) => {
                row.items.push(fragment);
                row.center_y = row.items.iter().map(|f| f.bbox.center_y()).sum::<f32>()
                    / row.items.len() as f32;
            }
            None => rows.push(Row {
                center_y: center,
                items: vec![fragment],
            }),
        }
    }

    let mut ordered = Vec::with_capacity(fragments.len());
    for row in &mut rows {
        row.items
            .sort_by(|a, b| a.bbox.x.cmp(&b.bbox.x).then(a.bbox.y.cmp(&b.bbox.y)));
        ordered.extend(row.items.iter().copied());
    }
    ordered
}
