use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig, Error as ClientError};
use gcloud_spanner::mutation::insert_or_update;
use gcloud_spanner::statement::Statement;
use std::sync::Arc;

use crate::config::SpannerConfig;
use crate::models::SettingsRecord;
use crate::store::{RecordStore, StoreError, StoreResult};

const TABLE: &str = "settings_records";

/// Expiry is stored as epoch seconds; Spanner's TTL works on a TIMESTAMP, so a
/// stored generated column converts it and carries the row deletion policy.
const CREATE_TABLE_DDL: &str = r#"
CREATE TABLE settings_records (
    id STRING(36) NOT NULL,
    data BYTES(MAX),
    expiry_timestamp INT64 NOT NULL,
    expires_at TIMESTAMP AS (TIMESTAMP_SECONDS(expiry_timestamp)) STORED,
) PRIMARY KEY (id),
ROW DELETION POLICY (OLDER_THAN(expires_at, INTERVAL 0 DAY))
"#;

/// Map a gRPC status to the store's error kinds
fn classify_status(status: Status, what: &str) -> StoreError {
    match status.code() {
        Code::InvalidArgument | Code::OutOfRange => {
            StoreError::BadRequest(format!("{}: {}", what, status.message()))
        }
        _ => StoreError::Unavailable(anyhow::anyhow!("{}: {}", what, status)),
    }
}

fn classify_client_error(err: ClientError, what: &str) -> StoreError {
    match err {
        ClientError::GRPC(status) => classify_status(status, what),
        other => StoreError::Unavailable(anyhow::Error::new(other).context(what.to_string())),
    }
}

/// Shareable Spanner-backed record store
#[derive(Clone)]
pub struct SpannerStore {
    inner: Arc<Client>,
}

impl SpannerStore {
    /// Connect to Spanner, provisioning the instance, database and table
    /// first if they don't exist yet.
    ///
    /// The gcloud-spanner library picks up `SPANNER_EMULATOR_HOST` from the
    /// environment and connects to the emulator when it is set.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }
}

#[async_trait]
impl RecordStore for SpannerStore {
    async fn put(&self, record: SettingsRecord) -> StoreResult<()> {
        let mutation = insert_or_update(
            TABLE,
            &["id", "data", "expiry_timestamp"],
            &[&record.id, &record.data, &record.expiry],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .map_err(|e| classify_client_error(e, "Failed to write record to Spanner"))?;

        tracing::debug!("Wrote record with id: {}", record.id);
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<SettingsRecord>> {
        let mut statement = Statement::new(
            "SELECT id, data, expiry_timestamp FROM settings_records WHERE id = @id"
        );
        statement.add_param("id", &id.to_string());

        let mut tx = self.inner
            .single()
            .await
            .map_err(|e| classify_client_error(e, "Failed to create read transaction"))?;

        let mut result_set = tx
            .query(statement)
            .await
            .map_err(|s| classify_status(s, "Failed to query record from Spanner"))?;

        let row = result_set
            .next()
            .await
            .map_err(|s| classify_status(s, "Failed to read record row"))?;

        let Some(row) = row else {
            tracing::debug!("Record not found with id: {}", id);
            return Ok(None);
        };

        let decode = |e: gcloud_spanner::row::Error| {
            StoreError::Unavailable(anyhow::Error::new(e).context("Failed to decode record row"))
        };
        let id: String = row.column_by_name("id").map_err(decode)?;
        let data: Option<Vec<u8>> = row.column_by_name("data").map_err(decode)?;
        let expiry: i64 = row.column_by_name("expiry_timestamp").map_err(decode)?;

        tracing::debug!("Read record with id: {}", id);
        Ok(Some(SettingsRecord {
            id,
            data: data.unwrap_or_default(),
            expiry,
        }))
    }

    /// Run `SELECT 1` to confirm the database answers
    async fn health_check(&self) -> StoreResult<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .map_err(|e| classify_client_error(e, "Failed to create health check transaction"))?;

        let mut result_set = tx
            .query(statement)
            .await
            .map_err(|s| classify_status(s, "Failed to execute health check query"))?;

        match result_set.next().await {
            Ok(Some(_)) => {
                tracing::debug!("Health check query succeeded");
                Ok(())
            }
            Ok(None) => Err(StoreError::Unavailable(anyhow::anyhow!(
                "Health check query returned no results"
            ))),
            Err(s) => Err(classify_status(s, "Failed to read health check result")),
        }
    }
}

/// Automatically provision Spanner instance, database, and table
///
/// Lets the service start against a fresh emulator with no manual setup.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_table_exists(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if config.emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

async fn ensure_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let table_exists = ddl_response
        .into_inner()
        .statements
        .iter()
        .any(|stmt| stmt.contains("CREATE TABLE settings_records") || stmt.contains("CREATE TABLE `settings_records`"));

    if table_exists {
        tracing::info!("Table '{}' already exists", TABLE);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", TABLE);

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![CREATE_TABLE_DDL.trim().to_string()],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created successfully", TABLE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    /// Connects only when an emulator address is already exported
    async fn emulator_store(instance: &str) -> Option<SpannerStore> {
        let emulator_host = std::env::var("SPANNER_EMULATOR_HOST").ok()?;

        let config = SpannerConfig {
            emulator_host: Some(emulator_host),
            project: "test-project".to_string(),
            instance: instance.to_string(),
            database: format!("{}-db", instance),
        };

        match SpannerStore::from_config(&config).await {
            Ok(store) => Some(store),
            Err(e) => {
                println!("Skipping Spanner test, emulator unreachable: {:#}", e);
                None
            }
        }
    }

    #[test]
    fn test_store_is_clonable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<SpannerStore>();
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpannerStore>();
    }

    #[test]
    fn test_ddl_declares_ttl_policy() {
        assert!(CREATE_TABLE_DDL.contains("ROW DELETION POLICY (OLDER_THAN(expires_at, INTERVAL 0 DAY))"));
        assert!(CREATE_TABLE_DDL.contains("expiry_timestamp INT64 NOT NULL"));
    }

    #[test]
    fn test_invalid_argument_is_bad_request() {
        let err = classify_status(Status::new(Code::InvalidArgument, "key too long"), "read");
        assert!(matches!(err, StoreError::BadRequest(msg) if msg.contains("key too long")));
    }

    #[test]
    fn test_other_status_is_unavailable() {
        let err = classify_status(Status::new(Code::Unavailable, "connection refused"), "read");
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err = classify_status(Status::new(Code::PermissionDenied, "denied"), "write");
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let Some(store) = emulator_store("settings-crud-test").await else {
            return;
        };

        let record = SettingsRecord {
            id: Uuid::new_v4().to_string(),
            data: vec![0, 1, 2, 255],
            expiry: Utc::now().timestamp() + 3600,
        };

        store.put(record.clone()).await.expect("put should succeed");

        let fetched = store.get(&record.id).await.expect("get should succeed");
        assert_eq!(fetched, Some(record));

        let missing = store.get(&Uuid::new_v4().to_string()).await.expect("get should succeed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_auto_provisioning_idempotent() {
        let Some(_) = emulator_store("settings-idempotent-test").await else {
            return;
        };

        let second = emulator_store("settings-idempotent-test").await;
        assert!(second.is_some(), "Second auto-provisioning call should succeed");
    }

    #[tokio::test]
    async fn test_health_check() {
        let Some(store) = emulator_store("settings-health-test").await else {
            return;
        };

        assert!(store.health_check().await.is_ok());
    }
}
