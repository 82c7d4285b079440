use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Subscription, SubscriptionStatus};

const COLUMNS: &str = "id, email, status, created_at";

/// What a subscribe call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created,
    AlreadySubscribed,
    Reactivated,
}

impl SubscribeOutcome {
    pub fn for_existing(existing: Option<&Subscription>) -> Self {
        match existing {
            None => Self::Created,
            Some(s) if s.is_active() => Self::AlreadySubscribed,
            Some(_) => Self::Reactivated,
        }
    }
}

impl Subscription {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Subscription>> {
        let row = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {COLUMNS} FROM newsletter_subscriptions WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn subscribe(db: &PgPool, email: &str) -> anyhow::Result<SubscribeOutcome> {
        let existing = Self::find_by_email(db, email).await?;
        let outcome = SubscribeOutcome::for_existing(existing.as_ref());
        match outcome {
            SubscribeOutcome::Created => {
                sqlx::query(
                    "INSERT INTO newsletter_subscriptions (email, status) VALUES ($1, $2) \
                     ON CONFLICT (email) DO NOTHING",
                )
                .bind(email)
                .bind(SubscriptionStatus::Subscribed.as_str())
                .execute(db)
                .await?;
            }
            SubscribeOutcome::Reactivated => {
                Self::set_status(db, email, SubscriptionStatus::Subscribed).await?;
            }
            SubscribeOutcome::AlreadySubscribed => {}
        }
        Ok(outcome)
    }

    /// Returns false when the address was never subscribed.
    pub async fn set_status(
        db: &PgPool,
        email: &str,
        status: SubscriptionStatus,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE newsletter_subscriptions SET status = $2 WHERE email = $1")
            .bind(email)
            .bind(status.as_str())
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn list(
        db: &PgPool,
        status: Option<SubscriptionStatus>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {COLUMNS} FROM newsletter_subscriptions \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(status.map(SubscriptionStatus::as_str))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn all(db: &PgPool) -> anyhow::Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {COLUMNS} FROM newsletter_subscriptions ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM newsletter_subscriptions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn count_active(db: &PgPool) -> anyhow::Result<i64> {
        let (n,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM newsletter_subscriptions WHERE status = $1")
                .bind(SubscriptionStatus::Subscribed.as_str())
                .fetch_one(db)
                .await?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sub(status: &str) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            status: status.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn outcome_depends_on_existing_row() {
        assert_eq!(SubscribeOutcome::for_existing(None), SubscribeOutcome::Created);
        assert_eq!(
            SubscribeOutcome::for_existing(Some(&sub("subscribed"))),
            SubscribeOutcome::AlreadySubscribed
        );
        assert_eq!(
            SubscribeOutcome::for_existing(Some(&sub("unsubscribed"))),
            SubscribeOutcome::Reactivated
        );
    }
}
