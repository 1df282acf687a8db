use std::sync::Arc;

use crate::{
    database::GiveawayStore,
    giveaway::GiveawayError,
    models::giveaway::{Giveaway, GiveawayFilter, GiveawaySort, SortOrder},
};

/// Read-only views over stored giveaways.
#[derive(Clone)]
pub struct Lister {
    store: Arc<dyn GiveawayStore>,
}

impl Lister {
    pub fn new(store: Arc<dyn GiveawayStore>) -> Self {
        Lister { store }
    }

    pub async fn query(&self, filter: &GiveawayFilter) -> Result<Vec<Giveaway>, GiveawayError> {
        self.store.find_by_filter(filter).await
    }

    pub async fn get_active(&self) -> Result<Vec<Giveaway>, GiveawayError> {
        self.query(&GiveawayFilter {
            active: Some(true),
            ..GiveawayFilter::default()
        })
        .await
    }

    pub async fn get_ended(&self) -> Result<Vec<Giveaway>, GiveawayError> {
        self.query(&GiveawayFilter {
            active: Some(false),
            ..GiveawayFilter::default()
        })
        .await
    }

    pub async fn get_recent(&self, limit: i64) -> Result<Vec<Giveaway>, GiveawayError> {
        self.query(&GiveawayFilter {
            sort_by: Some(GiveawaySort::StartTime),
            sort_order: Some(SortOrder::Descending),
            limit: Some(limit),
            ..GiveawayFilter::default()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Lister;
    use crate::{
        giveaway::test_utils::{open_giveaway, MemoryGiveawayStore},
        models::giveaway::{GiveawayFilter, GiveawaySort, SortOrder},
    };

    async fn seeded_store() -> Arc<MemoryGiveawayStore> {
        let store = Arc::new(MemoryGiveawayStore::new());
        for (id, start_time, ended) in [(1, 500, true), (2, 900, false), (3, 700, false)] {
            let mut giveaway = open_giveaway(id, &[], 1);
            giveaway.start_time = start_time;
            giveaway.ended = ended;
            store.insert(giveaway).await;
        }
        store
    }

    #[tokio::test]
    async fn default_sort_is_id_descending() {
        let lister = Lister::new(seeded_store().await);

        let all = lister.query(&GiveawayFilter::default()).await.unwrap();

        let ids: Vec<i64> = all.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn active_and_ended_views_partition_the_records() {
        let lister = Lister::new(seeded_store().await);

        let active = lister.get_active().await.unwrap();
        let ended = lister.get_ended().await.unwrap();

        assert_eq!(active.iter().map(|g| g.id).collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(ended.iter().map(|g| g.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn recent_sorts_by_start_time_and_limits() {
        let lister = Lister::new(seeded_store().await);

        let recent = lister.get_recent(2).await.unwrap();

        assert_eq!(recent.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn explicit_sort_key_defaults_to_ascending() {
        let lister = Lister::new(seeded_store().await);

        let by_start = lister
            .query(&GiveawayFilter {
                sort_by: Some(GiveawaySort::StartTime),
                ..GiveawayFilter::default()
            })
            .await
            .unwrap();

        assert_eq!(by_start.iter().map(|g| g.id).collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn limit_truncates_after_sorting() {
        let lister = Lister::new(seeded_store().await);

        let top = lister
            .query(&GiveawayFilter {
                sort_order: Some(SortOrder::Ascending),
                sort_by: Some(GiveawaySort::Id),
                limit: Some(1),
                ..GiveawayFilter::default()
            })
            .await
            .unwrap();

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, 1);
    }
}
