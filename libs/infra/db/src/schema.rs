// [libs/infra/db/src/schema.rs]
//! Esquema de las tres tablas persistidas (§6). Aplicado de forma
//! idempotente en la ignicion del pool, a la manera del bootstrap del
//! esquema del motor que precede a este (ver DESIGN.md).

use sqlx::PgPool;

pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS oauth_states (
            state_hash  TEXT PRIMARY KEY,
            mode        TEXT NOT NULL CHECK (mode IN ('test', 'live')),
            expires_at  TIMESTAMPTZ NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS oauth_connections (
            tenant_id                  TEXT NOT NULL,
            livemode                   BOOLEAN NOT NULL,
            scope                      TEXT NOT NULL,
            publishable_identifier     TEXT,
            access_token_ct            TEXT NOT NULL,
            access_token_expires_at    TIMESTAMPTZ NOT NULL,
            refresh_token_ct           TEXT NOT NULL,
            refresh_token_rotated_at   TIMESTAMPTZ NOT NULL,
            created_at                 TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at                 TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (tenant_id, livemode)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS provisioned_databases (
            tenant_id           TEXT PRIMARY KEY,
            project_ref         TEXT NOT NULL,
            db_password_ct      TEXT NOT NULL,
            connection_host     TEXT NOT NULL,
            region              TEXT NOT NULL,
            install_status      TEXT NOT NULL,
            install_step        TEXT,
            error_message       TEXT,
            created_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at          TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_oauth_states_expiry ON oauth_states (expires_at)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_oauth_connections_expiry ON oauth_connections (access_token_expires_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
