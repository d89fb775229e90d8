use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use sqlx::SqlitePool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real head counts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Presence filter over known employee ids.
///
/// `might_exist == false` is authoritative: the id is not in the store. A
/// positive answer has to be confirmed against the database.
pub struct EmployeeIdFilter {
    inner: RwLock<CuckooFilter<String>>,
}

impl Default for EmployeeIdFilter {
    fn default() -> Self {
        Self {
            inner: RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)),
        }
    }
}

impl EmployeeIdFilter {
    /// Build a filter holding every employee id currently stored.
    pub async fn warmed(pool: &SqlitePool, batch_size: usize) -> Result<Self> {
        let filter = Self::default();
        filter.warmup(pool, batch_size).await?;
        Ok(filter)
    }

    /// Check if an employee id might exist (false positives possible)
    pub fn might_exist(&self, employee_id: &str) -> bool {
        self.inner
            .read()
            .expect("employee filter poisoned")
            .contains(&employee_id.to_string())
    }

    pub fn insert(&self, employee_id: &str) {
        self.inner
            .write()
            .expect("employee filter poisoned")
            .add(&employee_id.to_string());
    }

    pub fn remove(&self, employee_id: &str) {
        self.inner
            .write()
            .expect("employee filter poisoned")
            .remove(&employee_id.to_string());
    }

    /// Stream ids out of the store and add them in batches.
    async fn warmup(&self, pool: &SqlitePool, batch_size: usize) -> Result<()> {
        let batch_size = batch_size.max(1);
        let mut stream =
            sqlx::query_as::<_, (String,)>("SELECT employee_id FROM employees").fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0usize;

        while let Some(row) = stream.next().await {
            let (employee_id,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

            batch.push(employee_id);
            total += 1;

            if batch.len() == batch_size {
                self.insert_batch(&batch);
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.insert_batch(&batch);
        }

        tracing::info!(total, "Employee id filter warmup complete");
        Ok(())
    }

    fn insert_batch(&self, employee_ids: &[String]) {
        let mut filter = self.inner.write().expect("employee filter poisoned");

        for employee_id in employee_ids {
            filter.add(employee_id);
        }
    }
}
