use async_trait::async_trait;
use rail_core::repository::{ProfileRepository, RepoResult};
use rail_shared::UserProfile;
use sqlx::types::Json;
use sqlx::PgPool;

// The stored createdAt wins over the incoming one, and the first write keeps its own.
const UPSERT_PROFILE: &str = r#"
    INSERT INTO profiles (uid, data, updated_at)
    VALUES ($1, $2, NOW())
    ON CONFLICT (uid) DO UPDATE
    SET data = EXCLUDED.data || jsonb_build_object(
            'createdAt',
            COALESCE(profiles.data -> 'createdAt', EXCLUDED.data -> 'createdAt')
        ),
        updated_at = NOW()
"#;

pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get_profile(&self, uid: &str) -> RepoResult<Option<UserProfile>> {
        let row: Option<(Json<UserProfile>,)> =
            sqlx::query_as("SELECT data FROM profiles WHERE uid = $1")
                .bind(uid)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(Json(profile),)| profile))
    }

    async fn save_profile(&self, profile: &UserProfile) -> RepoResult<()> {
        sqlx::query(UPSERT_PROFILE)
            .bind(&profile.uid)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
