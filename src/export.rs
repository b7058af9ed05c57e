use std::convert::Infallible;

use chrono::{DateTime, SecondsFormat, Utc};
use futures::{Stream, stream};

use crate::{
    db::ReviewStore,
    errors::AppError,
    models::{RatingFilter, Review},
};

pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Rating",
    "Review Text",
    "Summary",
    "Recommended Actions",
    "User Response",
    "Created At",
];

const ROWS_PER_CHUNK: usize = 256;

pub async fn load_export(
    store: &dyn ReviewStore,
    filter: RatingFilter,
    max_rows: usize,
) -> Result<Vec<Review>, AppError> {
    let reviews = store.list_all(filter, max_rows).await?;
    if reviews.len() == max_rows {
        tracing::warn!("Export hit the {} row limit and was truncated", max_rows);
    }
    Ok(reviews)
}

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("reviews_export_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

pub fn csv_stream(reviews: Vec<Review>) -> impl Stream<Item = Result<String, Infallible>> {
    let header = std::iter::once(csv_line(CSV_HEADER.iter().map(|s| s.to_string())));
    let mut rows = reviews.into_iter().peekable();
    let body = std::iter::from_fn(move || {
        rows.peek()?;
        Some(
            rows.by_ref()
                .take(ROWS_PER_CHUNK)
                .map(|review| review_row(&review))
                .collect::<String>(),
        )
    });

    stream::iter(header.chain(body).map(Ok))
}

pub fn render_csv(reviews: &[Review]) -> String {
    let mut out = csv_line(CSV_HEADER.iter().map(|s| s.to_string()));
    for review in reviews {
        out.push_str(&review_row(review));
    }
    out
}

fn review_row(review: &Review) -> String {
    csv_line([
        review.id.to_string(),
        review.rating.to_string(),
        review.review_text.clone(),
        review.summary.clone().unwrap_or_default(),
        review
            .recommended_actions
            .as_ref()
            .map(|actions| actions.join(", "))
            .unwrap_or_default(),
        review.user_response.clone(),
        review.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
    ])
}

fn csv_line(fields: impl IntoIterator<Item = String>) -> String {
    let mut line = fields
        .into_iter()
        .map(|f| escape_field(&f))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

// RFC 4180 quoting
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use chrono::TimeZone;
    use futures::StreamExt;
    use uuid::Uuid;

    fn review(rating: i64, text: &str, actions: Option<Vec<&str>>) -> Review {
        Review {
            id: Uuid::nil(),
            rating: Rating::new(rating).unwrap(),
            review_text: text.into(),
            summary: actions.as_ref().map(|_| "Short summary".to_string()),
            recommended_actions: actions.map(|a| a.into_iter().map(String::from).collect()),
            user_response: "Thanks".into(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
        }
    }

    #[test]
    fn escapes_only_when_needed() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn renders_header_and_rows() {
        let csv = render_csv(&[
            review(1, "Broken on arrival, \"new\" my foot", Some(vec!["Call", "Refund"])),
            review(5, "Lovely", None),
        ]);
        let lines: Vec<_> = csv.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "ID,Rating,Review Text,Summary,Recommended Actions,User Response,Created At"
        );
        assert_eq!(
            lines[1],
            "00000000-0000-0000-0000-000000000000,1,\"Broken on arrival, \"\"new\"\" my foot\",Short summary,\"Call, Refund\",Thanks,2025-03-14T09:26:53.000000Z"
        );
        assert!(lines[2].starts_with("00000000-0000-0000-0000-000000000000,5,Lovely,,,Thanks,"));
        assert_eq!(lines[3], "");
    }

    #[tokio::test]
    async fn stream_matches_rendered_csv() {
        let reviews: Vec<_> = (0..600).map(|_| review(3, "Fine", None)).collect();
        let expected = render_csv(&reviews);
        let chunks: Vec<String> = csv_stream(reviews)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;
        assert_eq!(chunks.len(), 1 + 3);
        assert_eq!(chunks.concat(), expected);
    }

    #[tokio::test]
    async fn stream_renders_chunks_on_demand() {
        let reviews: Vec<_> = (0..ROWS_PER_CHUNK + 1)
            .map(|_| review(2, "Late again", None))
            .collect();
        let mut stream = Box::pin(csv_stream(reviews));

        let header = stream.next().await.unwrap().unwrap();
        assert!(header.starts_with("ID,Rating,"));
        let full = stream.next().await.unwrap().unwrap();
        assert_eq!(full.matches("\r\n").count(), ROWS_PER_CHUNK);
        let tail = stream.next().await.unwrap().unwrap();
        assert_eq!(tail.matches("\r\n").count(), 1);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn empty_export_is_header_only() {
        let chunks: Vec<String> = csv_stream(Vec::new())
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn filename_uses_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(export_filename(now), "reviews_export_20250102_030405.csv");
    }
}
