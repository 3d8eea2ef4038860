use crate::DbError;
use core_types::{Customization, NewCustomization, UpdateCustomization};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Data access for the `customizations` table.
#[derive(Debug, Clone)]
pub struct CustomizationRepository {
    pool: SqlitePool,
}

impl CustomizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewCustomization) -> Result<Customization, DbError> {
        let description = new.description.trim();
        if description.is_empty() {
            return Err(DbError::Validation(
                "customization description is required".to_string(),
            ));
        }
        if new.price < 0.0 {
            return Err(DbError::Validation(
                "customization price must not be negative".to_string(),
            ));
        }

        let product_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = $1")
                .bind(new.product_id)
                .fetch_one(&self.pool)
                .await?;
        if product_exists == 0 {
            return Err(DbError::NotFound("product".to_string()));
        }

        let customization = Customization {
            id: Uuid::new_v4(),
            description: description.to_string(),
            price: new.price,
            product_id: new.product_id,
        };
        sqlx::query(
            "INSERT INTO customizations (id, description, price, product_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(customization.id)
        .bind(&customization.description)
        .bind(customization.price)
        .bind(customization.product_id)
        .execute(&self.pool)
        .await?;
        Ok(customization)
    }

    pub async fn get_all(&self) -> Result<Vec<Customization>, DbError> {
        let customizations = sqlx::query_as::<_, Customization>(
            "SELECT id, description, price, product_id FROM customizations ORDER BY description ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(customizations)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Customization>, DbError> {
        let customization = sqlx::query_as::<_, Customization>(
            "SELECT id, description, price, product_id FROM customizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customization)
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: &UpdateCustomization,
    ) -> Result<Customization, DbError> {
        let mut customization = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::NotFound("customization".to_string()))?;

        if let Some(description) = &update.description {
            if description.trim().is_empty() {
                return Err(DbError::Validation(
                    "customization description is required".to_string(),
                ));
            }
            customization.description = description.trim().to_string();
        }
        if let Some(price) = update.price {
            if price < 0.0 {
                return Err(DbError::Validation(
                    "customization price must not be negative".to_string(),
                ));
            }
            customization.price = price;
        }

        sqlx::query("UPDATE customizations SET description = $1, price = $2 WHERE id = $3")
            .bind(&customization.description)
            .bind(customization.price)
            .bind(customization.id)
            .execute(&self.pool)
            .await?;
        Ok(customization)
    }

    /// Deletes a customization. One that is still referenced by order items
    /// cannot be deleted; the conflict embeds the referencing-item count.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::NotFound("customization".to_string()))?;

        let item_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE customization_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if item_count > 0 {
            return Err(DbError::Conflict(format!(
                "customization is referenced by {item_count} order item(s) and cannot be deleted"
            )));
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM customizations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
