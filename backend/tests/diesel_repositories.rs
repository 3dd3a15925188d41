//! Integration tests for the Diesel repositories against embedded PostgreSQL.
//!
//! Each test owns a database cloned from a migrated template, so the
//! versioned updates, ordering, foreign keys, and cascades run as real SQL.
//! Setup happens outside the test's Tokio runtime; the runtime then drives
//! the async repository calls.

use std::sync::{Arc, OnceLock};

use blog_backend::domain::ports::{
    PostRepository, PostRepositoryError, ProfileRepository, ProfileRepositoryError, TagRepository,
    TagRepositoryError, UserRepository, UserRepositoryError,
};
use blog_backend::domain::{
    Email, NewPost, NewProfile, NewTag, NewUser, Nickname, Password, PasswordHash, PostChanges,
    PostContent, PostId, PostTitle, TagName, User, UserChanges, UserId,
};
use blog_backend::outbound::persistence::{
    DbPool, DieselPostRepository, DieselProfileRepository, DieselTagRepository,
    DieselUserRepository, PoolConfig,
};
use mockable::{Clock, DefaultClock};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::{handle_cluster_setup_failure, provision_database, shared_cluster};

struct TestContext {
    runtime: Runtime,
    users: DieselUserRepository,
    posts: DieselPostRepository,
    profiles: DieselProfileRepository,
    tags: DieselTagRepository,
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let cluster = shared_cluster()?;
    let database = provision_database(cluster)?;
    let runtime = Runtime::new().map_err(|err| format!("tokio runtime: {err}"))?;
    let config = PoolConfig::new(database.url()).with_max_size(4);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| format!("connection pool: {err}"))?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    Ok(TestContext {
        runtime,
        users: DieselUserRepository::new(pool.clone(), clock.clone()),
        posts: DieselPostRepository::new(pool.clone(), clock.clone()),
        profiles: DieselProfileRepository::new(pool.clone(), clock.clone()),
        tags: DieselTagRepository::new(pool, clock),
        _database: database,
    })
}

#[fixture]
fn context() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

// Argon2 is slow by design; one hash serves every test user.
fn shared_hash() -> PasswordHash {
    static HASH: OnceLock<PasswordHash> = OnceLock::new();
    HASH.get_or_init(|| {
        let password = Password::new("secret").expect("valid password");
        PasswordHash::derive(&password).expect("hash password")
    })
    .clone()
}

fn new_user(nickname: &str) -> NewUser {
    NewUser {
        nickname: Nickname::new(nickname).expect("valid nickname"),
        email: Email::new(format!("{nickname}@example.com")).expect("valid email"),
        password_hash: shared_hash(),
    }
}

fn new_post(author: &User, title: &str) -> NewPost {
    NewPost {
        author_id: author.id,
        title: PostTitle::new(title).expect("valid title"),
        content: PostContent::new(format!("{title} body")).expect("valid content"),
        like_count: 0,
        comment_count: 0,
    }
}

fn nickname_change(nickname: &str) -> UserChanges {
    UserChanges {
        nickname: Some(Nickname::new(nickname).expect("valid nickname")),
        ..UserChanges::default()
    }
}

#[rstest]
fn users_are_listed_in_insertion_order(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let mut created = Vec::new();
        for nickname in ["carol", "alice", "bob"] {
            created.push(ctx.users.create(new_user(nickname)).await.expect("create user"));
        }

        let listed = ctx.users.find_all().await.expect("list users");
        let nicknames: Vec<&str> = listed.iter().map(|user| user.nickname.as_ref()).collect();
        assert_eq!(nicknames, ["carol", "alice", "bob"]);
        assert!(
            listed
                .windows(2)
                .all(|pair| pair[0].additional_id < pair[1].additional_id)
        );
        assert_eq!(listed, created);
    });
}

#[rstest]
fn stored_password_hash_verifies_the_original_password(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let user = ctx.users.create(new_user("ada")).await.expect("create user");
        let found = ctx
            .users
            .find_by_id(&user.id)
            .await
            .expect("find user")
            .expect("user exists");
        let password = Password::new("secret").expect("valid password");
        assert!(found.password_hash.verify(&password));
        assert_eq!(found.version, 1);
    });
}

#[rstest]
fn update_bumps_version_and_keeps_creation_time(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let user = ctx.users.create(new_user("ada")).await.expect("create user");
        let updated = ctx
            .users
            .update(&user.id, nickname_change("grace"), user.version)
            .await
            .expect("update user");

        assert_eq!(updated.nickname.as_ref(), "grace");
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.version, 2);
        assert_eq!(updated.created_at, user.created_at);
        assert!(updated.updated_at >= user.updated_at);
    });
}

#[rstest]
fn stale_user_update_reports_version_conflict(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let user = ctx.users.create(new_user("ada")).await.expect("create user");
        ctx.users
            .update(&user.id, nickname_change("grace"), 1)
            .await
            .expect("first update");

        let err = ctx
            .users
            .update(&user.id, nickname_change("hopper"), 1)
            .await
            .expect_err("stale version must be rejected");
        assert_eq!(err, UserRepositoryError::version_conflict(1_u32, 2_u32));

        let stored = ctx
            .users
            .find_by_id(&user.id)
            .await
            .expect("find user")
            .expect("user exists");
        assert_eq!(stored.nickname.as_ref(), "grace");
    });
}

#[rstest]
fn update_of_unknown_user_reports_not_found(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let missing = UserId::random();
        let err = ctx
            .users
            .update(&missing, nickname_change("grace"), 1)
            .await
            .expect_err("unknown user must be rejected");
        assert_eq!(err, UserRepositoryError::not_found(missing));
    });
}

#[rstest]
fn deleting_a_user_cascades_to_profile_and_posts(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let author = ctx.users.create(new_user("ada")).await.expect("create user");
        let other = ctx.users.create(new_user("bob")).await.expect("create user");
        ctx.profiles
            .create(NewProfile {
                user_id: author.id,
                profile_image: Some("ada.png".to_owned()),
            })
            .await
            .expect("create profile");
        let doomed = ctx
            .posts
            .create(new_post(&author, "first"))
            .await
            .expect("create post");
        let kept = ctx
            .posts
            .create(new_post(&other, "second"))
            .await
            .expect("create post");

        ctx.users.delete(&author.id).await.expect("delete user");

        assert_eq!(ctx.users.find_by_id(&author.id).await.expect("find user"), None);
        assert_eq!(
            ctx.profiles
                .find_by_user_id(&author.id)
                .await
                .expect("find profile"),
            None
        );
        assert_eq!(ctx.posts.find_by_id(&doomed.id).await.expect("find post"), None);
        assert_eq!(
            ctx.posts.find_all().await.expect("list posts"),
            vec![kept]
        );
        assert_eq!(
            ctx.users.delete(&author.id).await,
            Err(UserRepositoryError::not_found(author.id))
        );
    });
}

#[rstest]
fn post_for_unknown_author_reports_author_not_found(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let ghost = ctx.users.create(new_user("ghost")).await.expect("create user");
        ctx.users.delete(&ghost.id).await.expect("delete user");

        let err = ctx
            .posts
            .create(new_post(&ghost, "orphan"))
            .await
            .expect_err("foreign key must reject the post");
        assert_eq!(err, PostRepositoryError::author_not_found(ghost.id));
    });
}

#[rstest]
fn posts_update_under_version_check_and_delete_once(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let author = ctx.users.create(new_user("ada")).await.expect("create user");
        let first = ctx
            .posts
            .create(new_post(&author, "first"))
            .await
            .expect("create post");
        let second = ctx
            .posts
            .create(new_post(&author, "second"))
            .await
            .expect("create post");
        assert!(first.id.get() < second.id.get());

        let changes = PostChanges {
            like_count: Some(5),
            ..PostChanges::default()
        };
        let liked = ctx
            .posts
            .update(&first.id, changes.clone(), first.version)
            .await
            .expect("update post");
        assert_eq!(liked.like_count, 5);
        assert_eq!(liked.version, 2);
        assert_eq!(liked.title, first.title);

        assert_eq!(
            ctx.posts.update(&first.id, changes.clone(), 1).await,
            Err(PostRepositoryError::version_conflict(1_u32, 2_u32))
        );
        let missing = PostId::new(i64::MAX).expect("positive id");
        assert_eq!(
            ctx.posts.update(&missing, changes, 1).await,
            Err(PostRepositoryError::not_found(missing))
        );

        ctx.posts.delete(&first.id).await.expect("delete post");
        assert_eq!(
            ctx.posts.delete(&first.id).await,
            Err(PostRepositoryError::not_found(first.id))
        );
        let remaining = ctx.posts.find_all().await.expect("list posts");
        assert_eq!(remaining, vec![second]);
    });
}

#[rstest]
fn profiles_are_one_per_existing_user(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        let user = ctx.users.create(new_user("ada")).await.expect("create user");
        let profile = ctx
            .profiles
            .create(NewProfile {
                user_id: user.id,
                profile_image: None,
            })
            .await
            .expect("create profile");
        assert_eq!(profile.user_id, user.id);
        assert_eq!(
            ctx.profiles
                .find_by_user_id(&user.id)
                .await
                .expect("find profile"),
            Some(profile)
        );

        let duplicate = ctx
            .profiles
            .create(NewProfile {
                user_id: user.id,
                profile_image: Some("again.png".to_owned()),
            })
            .await;
        assert_eq!(
            duplicate,
            Err(ProfileRepositoryError::already_exists(user.id))
        );

        let stranger = UserId::random();
        let orphan = ctx
            .profiles
            .create(NewProfile {
                user_id: stranger,
                profile_image: None,
            })
            .await;
        assert_eq!(orphan, Err(ProfileRepositoryError::user_not_found(stranger)));
    });
}

#[rstest]
fn tag_names_are_unique_and_listed_in_creation_order(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.runtime.block_on(async {
        for name in ["rust", "diesel"] {
            ctx.tags
                .create(NewTag {
                    name: TagName::new(name).expect("valid tag"),
                })
                .await
                .expect("create tag");
        }

        let duplicate = ctx
            .tags
            .create(NewTag {
                name: TagName::new("rust").expect("valid tag"),
            })
            .await;
        assert_eq!(
            duplicate,
            Err(TagRepositoryError::duplicate_name("rust".to_owned()))
        );

        let listed = ctx.tags.find_all().await.expect("list tags");
        let names: Vec<&str> = listed.iter().map(|tag| tag.name.as_ref()).collect();
        assert_eq!(names, ["rust", "diesel"]);
    });
}
