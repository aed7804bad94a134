//! Card management service.

use crate::{
    errors::{CardError, Result},
    types::*,
    validation,
};
use panel_storage::{iso_timestamp, Card, Storage};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Card service backed by a whole-document storage handle
///
/// Mutations hold `write_lock` across load, modify and save so concurrent
/// writers cannot lose each other's updates.
pub struct CardService<S: Storage + ?Sized> {
    storage: Arc<S>,
    write_lock: Mutex<()>,
}

impl<S: Storage + ?Sized> CardService<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    async fn load_cards(&self) -> Result<Vec<Card>> {
        Ok(self.storage.load().await?.cards)
    }

    /// All cards in display order, optionally filtered by a search term
    ///
    /// The term matches case-insensitively against name and description.
    pub async fn list_cards(&self, search: Option<&str>) -> Result<Vec<Card>> {
        let cards = self.load_cards().await?;

        let term = match search.map(str::trim) {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return Ok(cards),
        };

        Ok(cards
            .into_iter()
            .filter(|card| {
                card.name.to_lowercase().contains(&term)
                    || card.description.to_lowercase().contains(&term)
            })
            .collect())
    }

    pub async fn get_card(&self, card_id: &str) -> Result<Card> {
        self.load_cards()
            .await?
            .into_iter()
            .find(|card| card.id == card_id)
            .ok_or_else(|| CardError::NotFound(card_id.to_string()))
    }

    /// Create a card at the end of the display order
    pub async fn create_card(&self, input: NewCard) -> Result<Card> {
        let name = validation::name(&input.name)?;
        let icon = validation::required(&input.icon, "icon")?;
        let url = validation::url(&input.url)?;
        let description = validation::description(&input.description)?;

        let _guard = self.write_lock.lock().await;
        let mut cards = self.load_cards().await?;

        if name_taken(&cards, name, None) {
            return Err(CardError::NameConflict(name.to_string()));
        }

        let order = cards
            .iter()
            .map(|card| card.order)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .filter(|order| *order <= validation::MAX_ORDER)
            .ok_or_else(|| {
                CardError::Validation(
                    "Card order limit reached, reorder cards before adding more".to_string(),
                )
            })?;
        let card = Card {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            url: url.to_string(),
            description: description.to_string(),
            order,
            created_time: iso_timestamp(),
        };

        cards.push(card.clone());
        self.storage.save(&cards).await?;

        info!(card_id = %card.id, name = %card.name, order, "Card created");
        Ok(card)
    }

    /// Apply a partial update to a card
    pub async fn update_card(&self, card_id: &str, update: CardUpdate) -> Result<Card> {
        if update.is_empty() {
            return Err(CardError::Validation("Nothing to update".to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let mut cards = self.load_cards().await?;

        let index = cards
            .iter()
            .position(|card| card.id == card_id)
            .ok_or_else(|| CardError::NotFound(card_id.to_string()))?;

        let mut card = cards[index].clone();

        if let Some(name) = update.name.as_deref() {
            let name = validation::name(name)?;
            if name_taken(&cards, name, Some(card_id)) {
                return Err(CardError::NameConflict(name.to_string()));
            }
            card.name = name.to_string();
        }
        if let Some(icon) = update.icon.as_deref() {
            card.icon = validation::required(icon, "icon")?.to_string();
        }
        if let Some(url) = update.url.as_deref() {
            card.url = validation::url(url)?.to_string();
        }
        if let Some(description) = update.description.as_deref() {
            card.description = validation::description(description)?.to_string();
        }

        cards[index] = card.clone();
        self.storage.save(&cards).await?;

        info!(card_id = %card.id, "Card updated");
        Ok(card)
    }

    /// Remove a card and renumber the rest 1..n
    pub async fn delete_card(&self, card_id: &str) -> Result<Card> {
        let _guard = self.write_lock.lock().await;
        let mut cards = self.load_cards().await?;

        let index = cards
            .iter()
            .position(|card| card.id == card_id)
            .ok_or_else(|| CardError::NotFound(card_id.to_string()))?;

        let removed = cards.remove(index);
        for (position, card) in cards.iter_mut().enumerate() {
            card.order = position as u32 + 1;
        }

        self.storage.save(&cards).await?;

        info!(card_id = %removed.id, name = %removed.name, "Card deleted");
        Ok(removed)
    }

    /// Assign new display orders
    ///
    /// Cards not listed keep their current order. The saved list is sorted
    /// by the resulting order.
    pub async fn reorder_cards(&self, orders: &[CardOrder]) -> Result<()> {
        if orders.is_empty() {
            return Err(CardError::Validation("Order list must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for (i, item) in orders.iter().enumerate() {
            if item.order < 1 || item.order > i64::from(validation::MAX_ORDER) {
                return Err(CardError::Validation(format!(
                    "orders[{}].order must be between 1 and {}",
                    i,
                    validation::MAX_ORDER
                )));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CardError::Validation(format!(
                    "Card {} appears more than once",
                    item.id
                )));
            }
        }

        let _guard = self.write_lock.lock().await;
        let mut cards = self.load_cards().await?;

        for item in orders {
            let card = cards
                .iter_mut()
                .find(|card| card.id == item.id)
                .ok_or_else(|| CardError::NotFound(item.id.clone()))?;
            card.order = u32::try_from(item.order)
                .map_err(|_| CardError::Validation(format!("Invalid order {}", item.order)))?;
        }

        cards.sort_by_key(|card| card.order);
        self.storage.save(&cards).await?;

        info!(count = orders.len(), "Cards reordered");
        Ok(())
    }

    /// Check whether `name` could be used, ignoring the card `exclude_id`
    pub async fn validate_name(&self, name: &str, exclude_id: Option<&str>) -> Result<NameCheck> {
        let name = match validation::name(name) {
            Ok(name) => name,
            Err(CardError::Validation(message)) => return Ok(NameCheck::rejected(message)),
            Err(e) => return Err(e),
        };

        let cards = self.load_cards().await?;
        if name_taken(&cards, name, exclude_id) {
            return Ok(NameCheck::rejected(format!(
                "Card name '{}' already exists",
                name
            )));
        }

        Ok(NameCheck::available())
    }

    pub async fn stats(&self) -> Result<CardStats> {
        let document = self.storage.load().await?;
        let data_file_size = self.storage.size_bytes().await?;
        let cards = &document.cards;

        Ok(CardStats {
            total_cards: cards.len(),
            last_updated: document.config.last_updated.clone(),
            version: document.config.version.clone(),
            data_file_size,
            oldest_card: cards
                .iter()
                .min_by(|a, b| a.created_time.cmp(&b.created_time))
                .map(|card| card.name.clone()),
            newest_card: cards
                .iter()
                .max_by(|a, b| a.created_time.cmp(&b.created_time))
                .map(|card| card.name.clone()),
            max_order: cards.iter().map(|card| card.order).max().unwrap_or(0),
        })
    }
}

fn name_taken(cards: &[Card], name: &str, exclude_id: Option<&str>) -> bool {
    cards
        .iter()
        .any(|card| card.name == name && Some(card.id.as_str()) != exclude_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_storage::{JsonFileStorage, MemoryStorage};

    fn service() -> CardService<MemoryStorage> {
        CardService::new(Arc::new(MemoryStorage::new()))
    }

    fn new_card(name: &str) -> NewCard {
        NewCard {
            name: name.to_string(),
            icon: "bi-server".to_string(),
            url: "http://localhost:8080".to_string(),
            description: format!("{} dashboard", name),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_order_and_trims() {
        let service = service();

        let first = service
            .create_card(NewCard {
                name: "  Grafana  ".to_string(),
                icon: " bi-activity ".to_string(),
                url: " http://localhost:3000 ".to_string(),
                description: "  metrics ".to_string(),
            })
            .await
            .unwrap();
        let second = service.create_card(new_card("Portainer")).await.unwrap();

        assert_eq!(first.name, "Grafana");
        assert_eq!(first.icon, "bi-activity");
        assert_eq!(first.url, "http://localhost:3000");
        assert_eq!(first.description, "metrics");
        assert_eq!(first.order, 1);
        assert_eq!(second.order, 2);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let service = service();

        let mut bad_url = new_card("Bad");
        bad_url.url = "localhost:3000".to_string();
        assert!(matches!(
            service.create_card(bad_url).await,
            Err(CardError::Validation(_))
        ));

        let mut blank_icon = new_card("Blank");
        blank_icon.icon = "  ".to_string();
        assert!(matches!(
            service.create_card(blank_icon).await,
            Err(CardError::Validation(_))
        ));

        assert!(service.list_cards(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let service = service();
        service.create_card(new_card("X")).await.unwrap();

        assert!(matches!(
            service.create_card(new_card("X")).await,
            Err(CardError::NameConflict(name)) if name == "X"
        ));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let service = service();
        service.create_card(new_card("X")).await.unwrap();
        let other = service.create_card(new_card("Y")).await.unwrap();

        let rename = CardUpdate {
            name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_card(&other.id, rename).await,
            Err(CardError::NameConflict(_))
        ));

        // Keeping its own name is fine
        let same = CardUpdate {
            name: Some("Y".to_string()),
            ..Default::default()
        };
        assert!(service.update_card(&other.id, same).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let service = service();
        let card = service.create_card(new_card("Gitea")).await.unwrap();

        let updated = service
            .update_card(
                &card.id,
                CardUpdate {
                    url: Some("https://git.local".to_string()),
                    description: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Gitea");
        assert_eq!(updated.url, "https://git.local");
        assert_eq!(updated.description, "");
        assert_eq!(updated.created_time, card.created_time);
        assert_eq!(service.get_card(&card.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let service = service();
        let card = service.create_card(new_card("Gitea")).await.unwrap();

        assert!(matches!(
            service.update_card(&card.id, CardUpdate::default()).await,
            Err(CardError::Validation(_))
        ));
        assert!(matches!(
            service
                .update_card(
                    "missing",
                    CardUpdate {
                        icon: Some("bi-git".to_string()),
                        ..Default::default()
                    }
                )
                .await,
            Err(CardError::NotFound(_))
        ));
        assert!(matches!(
            service
                .update_card(
                    &card.id,
                    CardUpdate {
                        name: Some("   ".to_string()),
                        ..Default::default()
                    }
                )
                .await,
            Err(CardError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_renumbers() {
        let service = service();
        let a = service.create_card(new_card("A")).await.unwrap();
        let b = service.create_card(new_card("B")).await.unwrap();
        let c = service.create_card(new_card("C")).await.unwrap();

        let removed = service.delete_card(&b.id).await.unwrap();
        assert_eq!(removed.name, "B");

        let cards = service.list_cards(None).await.unwrap();
        let summary: Vec<_> = cards.iter().map(|c| (c.id.clone(), c.order)).collect();
        assert_eq!(summary, vec![(a.id, 1), (c.id, 2)]);

        assert!(matches!(
            service.delete_card(&b.id).await,
            Err(CardError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_matches_name_and_description() {
        let service = service();
        service.create_card(new_card("Grafana")).await.unwrap();
        let mut storage_card = new_card("Nextcloud");
        storage_card.description = "Private CLOUD storage".to_string();
        service.create_card(storage_card).await.unwrap();

        let by_name = service.list_cards(Some("graf")).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Grafana");

        let by_description = service.list_cards(Some("  cloud ")).await.unwrap();
        assert_eq!(by_description.len(), 1);

        assert_eq!(service.list_cards(Some("   ")).await.unwrap().len(), 2);
        assert!(service.list_cards(Some("zzz")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reorder_persists_ascending() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("cards.json");
        let service = CardService::new(Arc::new(JsonFileStorage::open(&path).unwrap()));

        let a = service.create_card(new_card("A")).await.unwrap();
        let b = service.create_card(new_card("B")).await.unwrap();
        let c = service.create_card(new_card("C")).await.unwrap();

        service
            .reorder_cards(&[
                CardOrder { id: a.id.clone(), order: 2 },
                CardOrder { id: b.id.clone(), order: 1 },
                CardOrder { id: c.id.clone(), order: 3 },
            ])
            .await
            .unwrap();

        // Reload through a fresh handle
        let reloaded = CardService::new(Arc::new(JsonFileStorage::open(&path).unwrap()));
        let cards = reloaded.list_cards(None).await.unwrap();
        let summary: Vec<_> = cards.iter().map(|c| (c.name.as_str(), c.order)).collect();
        assert_eq!(summary, vec![("B", 1), ("A", 2), ("C", 3)]);
    }

    #[tokio::test]
    async fn test_reorder_keeps_unlisted_cards() {
        let service = service();
        let a = service.create_card(new_card("A")).await.unwrap();
        service.create_card(new_card("B")).await.unwrap();

        service
            .reorder_cards(&[CardOrder { id: a.id.clone(), order: 5 }])
            .await
            .unwrap();

        let names: Vec<_> = service
            .list_cards(None)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_reorder_rejects_bad_input() {
        let service = service();
        let a = service.create_card(new_card("A")).await.unwrap();

        assert!(matches!(
            service.reorder_cards(&[]).await,
            Err(CardError::Validation(_))
        ));
        assert!(matches!(
            service
                .reorder_cards(&[CardOrder { id: a.id.clone(), order: 0 }])
                .await,
            Err(CardError::Validation(_))
        ));
        assert!(matches!(
            service
                .reorder_cards(&[
                    CardOrder { id: a.id.clone(), order: 1 },
                    CardOrder { id: a.id.clone(), order: 2 },
                ])
                .await,
            Err(CardError::Validation(_))
        ));
        assert!(matches!(
            service
                .reorder_cards(&[CardOrder { id: "ghost".to_string(), order: 1 }])
                .await,
            Err(CardError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_order_limit_does_not_overflow() {
        let service = service();
        let a = service.create_card(new_card("A")).await.unwrap();

        assert!(matches!(
            service
                .reorder_cards(&[CardOrder {
                    id: a.id.clone(),
                    order: i64::from(validation::MAX_ORDER) + 1,
                }])
                .await,
            Err(CardError::Validation(_))
        ));
        assert!(matches!(
            service
                .reorder_cards(&[CardOrder { id: a.id.clone(), order: u32::MAX as i64 }])
                .await,
            Err(CardError::Validation(_))
        ));

        service
            .reorder_cards(&[CardOrder {
                id: a.id.clone(),
                order: i64::from(validation::MAX_ORDER),
            }])
            .await
            .unwrap();
        assert!(matches!(
            service.create_card(new_card("B")).await,
            Err(CardError::Validation(_))
        ));
        assert_eq!(service.list_cards(None).await.unwrap().len(), 1);

        service
            .reorder_cards(&[CardOrder { id: a.id.clone(), order: 1 }])
            .await
            .unwrap();
        let b = service.create_card(new_card("B")).await.unwrap();
        assert_eq!(b.order, 2);
    }

    #[tokio::test]
    async fn test_stored_max_order_is_rejected_on_create() {
        let stored = Card {
            id: "legacy".to_string(),
            name: "Legacy".to_string(),
            icon: "bi-archive".to_string(),
            url: "http://legacy.local".to_string(),
            description: String::new(),
            order: u32::MAX,
            created_time: iso_timestamp(),
        };
        let service = CardService::new(Arc::new(MemoryStorage::with_cards(&[stored])));

        assert!(matches!(
            service.create_card(new_card("Fresh")).await,
            Err(CardError::Validation(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_creates_are_serialized() {
        let service = Arc::new(service());

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.create_card(new_card(&format!("Card {}", i))).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let cards = service.list_cards(None).await.unwrap();
        assert_eq!(cards.len(), 50);

        let orders: HashSet<u32> = cards.iter().map(|card| card.order).collect();
        assert_eq!(orders.len(), 50);
        assert_eq!(orders.iter().max(), Some(&50));
    }

    #[tokio::test]
    async fn test_validate_name() {
        let service = service();
        let card = service.create_card(new_card("Jellyfin")).await.unwrap();

        assert!(service.validate_name("Plex", None).await.unwrap().is_valid);
        assert!(!service.validate_name("Jellyfin", None).await.unwrap().is_valid);
        assert!(
            service
                .validate_name(" Jellyfin ", Some(&card.id))
                .await
                .unwrap()
                .is_valid
        );
        assert!(!service.validate_name("", None).await.unwrap().is_valid);
        assert!(!service.validate_name(&"n".repeat(51), None).await.unwrap().is_valid);
    }

    #[tokio::test]
    async fn test_stats() {
        let service = service();
        let empty = service.stats().await.unwrap();
        assert_eq!(empty.total_cards, 0);
        assert_eq!(empty.oldest_card, None);
        assert_eq!(empty.max_order, 0);

        service.create_card(new_card("Old")).await.unwrap();
        service.create_card(new_card("New")).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_cards, 2);
        assert_eq!(stats.max_order, 2);
        assert_eq!(stats.version, "1.0");
        assert!(stats.data_file_size > 0);
        assert!(stats.oldest_card.is_some());
        assert!(stats.newest_card.is_some());
    }
}
