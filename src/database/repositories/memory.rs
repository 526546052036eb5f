use std::sync::Mutex;

use async_trait::async_trait;

use crate::database::{RecordStore, StoreError, User};

#[derive(Default)]
struct Table {
    rows: Vec<User>,
    next_id: u64,
}

/// 进程内用户存储，ID 从 1 开始递增
#[derive(Default)]
pub struct InMemoryUserStore {
    table: Mutex<Table>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置数据
    pub fn with_users<'a>(users: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut table = store.lock();
            for (name, email) in users {
                table.push(name, email);
            }
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Table {
    fn push(&mut self, name: &str, email: &str) {
        self.next_id += 1;
        self.rows.push(User {
            id: self.next_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        });
    }
}

#[async_trait]
impl RecordStore for InMemoryUserStore {
    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.lock()
            .rows
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        // 负 offset 按 0 处理
        let offset = offset.max(0) as usize;
        Ok(self
            .lock()
            .rows
            .iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<User>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self
            .lock()
            .rows
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, name: &str, email: &str) -> Result<(), StoreError> {
        // 与 UPDATE 语义一致：ID 不存在时不报错
        if let Some(user) = self.lock().rows.iter_mut().find(|u| u.id == id) {
            user.name = name.to_string();
            user.email = email.to_string();
        }
        Ok(())
    }

    async fn insert(&self, name: &str, email: &str) -> Result<(), StoreError> {
        self.lock().push(name, email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryUserStore {
        InMemoryUserStore::with_users([
            ("Ann", "ann@example.com"),
            ("Bob", "bob@example.com"),
            ("Cara", "cara@corp.io"),
        ])
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = seeded();
        store.insert("Dan", "dan@example.com").await.unwrap();
        let dan = store.get_by_id("4").await.unwrap();
        assert_eq!(dan.name, "Dan");
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let store = seeded();
        assert!(matches!(
            store.get_by_id("99").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn paging_windows() {
        let store = seeded();
        let page: Vec<_> = store
            .fetch_page(2, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(page, vec!["Cara"]);
        assert!(store.fetch_page(0, 0).await.unwrap().is_empty());
        assert_eq!(store.fetch_page(2, -2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_name_and_email() {
        let store = seeded();
        assert_eq!(store.search("ANN").await.unwrap().len(), 1);
        assert_eq!(store.search("example").await.unwrap().len(), 2);
        assert_eq!(store.search("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_a_no_op() {
        let store = seeded();
        store.update("99", "X", "x@x").await.unwrap();
        store.update("2", "Robert", "rob@example.com").await.unwrap();
        assert_eq!(store.get_by_id("2").await.unwrap().name, "Robert");
    }
}
