/// Marker written to the 4th column once a row has been posted.
pub const PUBLISHED_FLAG: &str = "TRUE";

/// One post row: text, video link, affiliate link and the published flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub text: String,
    pub video_url: String,
    pub affiliate_link: String,
    pub published_flag: String,
}

impl SheetRow {
    /// Build a row from raw cells, padding missing trailing cells with `""`.
    /// Cells past the 4th are ignored.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            text: cell(0),
            video_url: cell(1),
            affiliate_link: cell(2),
            published_flag: cell(3),
        }
    }

    pub fn is_published(&self) -> bool {
        self.published_flag.to_uppercase() == PUBLISHED_FLAG
    }

    pub fn post_pair(&self) -> PostPair {
        PostPair::new(&self.text, &self.video_url, &self.affiliate_link)
    }
}

/// A row that still has to be posted, with its 1-based sheet row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRow {
    pub row_number: usize,
    pub row: SheetRow,
}

/// The two messages submitted for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPair {
    pub primary: String,
    pub reply: String,
}

impl PostPair {
    pub fn new(text: &str, url: &str, link: &str) -> Self {
        Self {
            primary: format!("{}\n{}", text, url),
            reply: link.to_string(),
        }
    }
}

/// Ids the platform assigned to a successfully published pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPair {
    pub primary_id: String,
    pub reply_id: String,
}

/// What a single pipeline run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Every row is already marked (or the sheet is empty).
    NothingToDo,
    /// Found a pending row but was told not to publish it.
    DryRun(PendingRow),
    Published {
        row_number: usize,
        ids: PublishedPair,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn short_rows_are_padded() {
        let row = SheetRow::from_cells(&cells(&["Great post", "http://v.example/1"]));
        assert_eq!(row.affiliate_link, "");
        assert_eq!(row.published_flag, "");
        assert!(!row.is_published());
    }

    #[test]
    fn extra_cells_are_ignored() {
        let row = SheetRow::from_cells(&cells(&["a", "b", "c", "true", "note"]));
        assert_eq!(row.published_flag, "true");
        assert!(row.is_published());
    }

    #[test]
    fn flag_must_be_exactly_true() {
        for flag in ["TRUE", "true", "True"] {
            assert!(SheetRow::from_cells(&cells(&["a", "b", "c", flag])).is_published());
        }
        for flag in ["", "FALSE", " TRUE", "yes"] {
            assert!(!SheetRow::from_cells(&cells(&["a", "b", "c", flag])).is_published());
        }
    }

    #[test]
    fn primary_message_joins_text_and_url() {
        let pair = PostPair::new("Great post", "http://v.example/1", "http://aff.example/1");
        assert_eq!(pair.primary, "Great post\nhttp://v.example/1");
        assert_eq!(pair.reply, "http://aff.example/1");
    }
}
