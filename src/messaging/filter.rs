//! Filtri della casella messaggi
//!
//! Vista, stato, periodo e testo sono predicati indipendenti; il risultato è
//! ordinato per data decrescente e ricalcolato ad ogni chiamata.

use super::MessageList;
use crate::entities::{DateBucket, Message, MessageView, StatusFilter};
use chrono::{DateTime, Duration, Months, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageFilter {
    pub view: MessageView,
    pub status: StatusFilter,
    pub period: DateBucket,
    pub search: String,
}

impl MessageFilter {
    pub fn inbox() -> Self {
        Self {
            view: MessageView::Inbox,
            ..Self::default()
        }
    }

    pub fn apply(&self, list: &MessageList, user_id: &str, now: DateTime<Utc>) -> Vec<Message> {
        let needle = self.search.trim().to_lowercase();

        let mut visible: Vec<Message> = list
            .iter()
            .filter(|m| self.matches_view(m, list, user_id))
            .filter(|m| self.matches_status(m))
            .filter(|m| self.matches_period(m, now))
            .filter(|m| needle.is_empty() || m.matches_text(&needle))
            .cloned()
            .collect();

        visible.sort_by(|a, b| b.date.cmp(&a.date));
        visible
    }

    fn matches_view(&self, m: &Message, list: &MessageList, user_id: &str) -> bool {
        match self.view {
            MessageView::All => true,
            MessageView::Inbox => m.is_received_by(user_id),
            MessageView::Sent => m.is_sent_by(user_id),
            MessageView::Starred => list.is_starred(&m.id),
        }
    }

    fn matches_status(&self, m: &Message) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Read => m.read,
            StatusFilter::Unread => !m.read,
        }
    }

    fn matches_period(&self, m: &Message, now: DateTime<Utc>) -> bool {
        match self.period {
            DateBucket::All => true,
            DateBucket::Today => m.date.date_naive() == now.date_naive(),
            DateBucket::Week => m.date >= now - Duration::days(7),
            DateBucket::Month => {
                let start = now.checked_sub_months(Months::new(1)).unwrap_or(now);
                m.date >= start
            }
        }
    }
}
