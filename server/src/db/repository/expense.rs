//! Expense Repository

use super::{RepoError, RepoResult};
use shared::models::{Expense, ExpenseCreate, ExpenseUpdate, ExpenseWithCategory};
use sqlx::SqlitePool;

const EXPENSE_WITH_CATEGORY_SELECT: &str = "SELECT e.id, e.expense_category_id, \
     ec.name AS category_name, e.branch_id, e.description, e.amount, e.incurred_on, \
     e.recorded_by, e.created_at, e.updated_at \
     FROM expense e JOIN expense_category ec ON e.expense_category_id = ec.id";

/// List filters; dates are YYYY-MM-DD inclusive
#[derive(Debug, Default, Clone)]
pub struct ExpenseFilter {
    pub branch_id: Option<i64>,
    pub category_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn find_all(pool: &SqlitePool, filter: ExpenseFilter) -> RepoResult<Vec<ExpenseWithCategory>> {
    let sql = format!(
        "{EXPENSE_WITH_CATEGORY_SELECT} WHERE (?1 IS NULL OR e.branch_id = ?1) \
         AND (?2 IS NULL OR e.expense_category_id = ?2) \
         AND (?3 IS NULL OR e.incurred_on >= ?3) \
         AND (?4 IS NULL OR e.incurred_on <= ?4) \
         ORDER BY e.incurred_on DESC, e.created_at DESC"
    );
    let rows = sqlx::query_as::<_, ExpenseWithCategory>(&sql)
        .bind(filter.branch_id)
        .bind(filter.category_id)
        .bind(&filter.from)
        .bind(&filter.to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Expense>> {
    let row = sqlx::query_as::<_, Expense>(
        "SELECT id, expense_category_id, branch_id, description, amount, incurred_on, \
         recorded_by, created_at, updated_at FROM expense WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    data: ExpenseCreate,
    recorded_by: i64,
) -> RepoResult<Expense> {
    let category_exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM expense_category WHERE id = ? AND is_active = 1")
            .bind(data.expense_category_id)
            .fetch_one(pool)
            .await?;
    if category_exists == 0 {
        return Err(RepoError::Validation(format!(
            "Expense category {} does not exist",
            data.expense_category_id
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO expense (id, expense_category_id, branch_id, description, amount, \
         incurred_on, recorded_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(data.expense_category_id)
    .bind(data.branch_id)
    .bind(&data.description)
    .bind(data.amount)
    .bind(&data.incurred_on)
    .bind(recorded_by)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create expense".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ExpenseUpdate) -> RepoResult<Expense> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE expense SET expense_category_id = COALESCE(?1, expense_category_id), \
         description = COALESCE(?2, description), amount = COALESCE(?3, amount), \
         incurred_on = COALESCE(?4, incurred_on), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.expense_category_id)
    .bind(&data.description)
    .bind(data.amount)
    .bind(&data.incurred_on)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Expense {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Expense {id} not found")))
}

/// Hard delete; expenses carry no downstream references.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM expense WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
