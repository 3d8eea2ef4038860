use crate::DbError;
use core_types::{Customization, NewProduct, Product, ProductWithCustomizations};
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Data access for the `products` table.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewProduct) -> Result<Product, DbError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(DbError::Validation("product name is required".to_string()));
        }
        self.ensure_name_free(name, None).await?;

        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        sqlx::query("INSERT INTO products (id, name) VALUES ($1, $2)")
            .bind(product.id)
            .bind(&product.name)
            .execute(&self.pool)
            .await?;
        Ok(product)
    }

    /// Fetches all products, each with its customizations.
    pub async fn get_all(&self) -> Result<Vec<ProductWithCustomizations>, DbError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT id, name FROM products ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;

        let customizations = sqlx::query_as::<_, Customization>(
            "SELECT id, description, price, product_id FROM customizations ORDER BY description ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_product: HashMap<Uuid, Vec<Customization>> = HashMap::new();
        for customization in customizations {
            by_product
                .entry(customization.product_id)
                .or_default()
                .push(customization);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let customizations = by_product.remove(&product.id).unwrap_or_default();
                ProductWithCustomizations {
                    product,
                    customizations,
                }
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>, DbError> {
        let product = sqlx::query_as::<_, Product>("SELECT id, name FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, update: &NewProduct) -> Result<Product, DbError> {
        let mut product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::NotFound("product".to_string()))?;

        let name = update.name.trim();
        if name.is_empty() {
            return Err(DbError::Validation("product name is required".to_string()));
        }
        self.ensure_name_free(name, Some(id)).await?;

        product.name = name.to_string();
        sqlx::query("UPDATE products SET name = $1 WHERE id = $2")
            .bind(&product.name)
            .bind(product.id)
            .execute(&self.pool)
            .await?;
        Ok(product)
    }

    /// Deletes a product. A product that still has customizations attached,
    /// or that is referenced by order items, cannot be deleted; the conflict
    /// embeds the referencing count.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::NotFound("product".to_string()))?;

        let customization_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customizations WHERE product_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if customization_count > 0 {
            return Err(DbError::Conflict(format!(
                "product has {customization_count} customization(s) and cannot be deleted"
            )));
        }

        let item_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE product_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if item_count > 0 {
            return Err(DbError::Conflict(format!(
                "product is referenced by {item_count} order item(s) and cannot be deleted"
            )));
        }

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, exclude: Option<Uuid>) -> Result<(), DbError> {
        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM products WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        if let Some(existing_id) = existing {
            if Some(existing_id) != exclude {
                return Err(DbError::Conflict(format!(
                    "a product named '{name}' already exists"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_customization, seed_product, setup_test_db};

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let pool = setup_test_db().await;
        let repo = ProductRepository::new(pool);

        repo.create(&NewProduct {
            name: "Idli".to_string(),
        })
        .await
        .unwrap();
        let err = repo
            .create(&NewProduct {
                name: "Idli".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn rename_to_taken_name_is_a_conflict_but_self_rename_is_not() {
        let pool = setup_test_db().await;
        let repo = ProductRepository::new(pool);

        let idli = repo
            .create(&NewProduct {
                name: "Idli".to_string(),
            })
            .await
            .unwrap();
        repo.create(&NewProduct {
            name: "Dosa".to_string(),
        })
        .await
        .unwrap();

        // Re-saving with its own name is fine.
        repo.update(
            idli.id,
            &NewProduct {
                name: "Idli".to_string(),
            },
        )
        .await
        .unwrap();

        let err = repo
            .update(
                idli.id,
                &NewProduct {
                    name: "Dosa".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_then_delete_without_references_succeeds() {
        let pool = setup_test_db().await;
        let repo = ProductRepository::new(pool);

        let product = repo
            .create(&NewProduct {
                name: "Poha".to_string(),
            })
            .await
            .unwrap();
        repo.delete(product.id).await.unwrap();
        assert!(repo.get_by_id(product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_with_customization_reports_the_count() {
        let pool = setup_test_db().await;
        let repo = ProductRepository::new(pool.clone());

        let product = seed_product(&pool, "Thali").await;
        seed_customization(&pool, product.id, "Extra roti", 10.0).await;

        let err = repo.delete(product.id).await.unwrap_err();
        match err {
            DbError::Conflict(msg) => assert!(msg.contains('1'), "message was: {msg}"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_all_groups_customizations_under_their_product() {
        let pool = setup_test_db().await;
        let repo = ProductRepository::new(pool.clone());

        let thali = seed_product(&pool, "Thali").await;
        let poha = seed_product(&pool, "Poha").await;
        seed_customization(&pool, thali.id, "Extra roti", 10.0).await;
        seed_customization(&pool, thali.id, "Sweet", 25.0).await;

        let all = repo.get_all().await.unwrap();
        let thali_row = all.iter().find(|p| p.product.id == thali.id).unwrap();
        let poha_row = all.iter().find(|p| p.product.id == poha.id).unwrap();
        assert_eq!(thali_row.customizations.len(), 2);
        assert!(poha_row.customizations.is_empty());
    }
}
