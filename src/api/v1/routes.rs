/*
 * Responsibility
 * - URL layout of v1
 * - Which methods need a logged-in user or an administrator: applied with
 *   route_layer on the individual MethodRouter, so public GETs on the same
 *   path stay public
 */
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
};

use crate::middleware::auth::access::{verify_admin, verify_logged_user};
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, register},
    comments::{
        comments_by_author, comments_by_post, create_comment, delete_comment, get_comment,
        update_comment,
    },
    health::health,
    likes::{create_like, delete_like, get_like, likes_by_post, likes_by_user},
    posts::{
        create_post, delete_post, filter_posts, get_post, list_posts, post_by_title,
        posts_by_author, posts_by_category, posts_by_year_month, posts_current_month,
        posts_current_year, rename_post, update_post,
    },
    users::{
        block_user, change_password, change_role, delete_user, get_user, get_user_by_email,
        list_users, unblock_user, update_user,
    },
};

pub fn routes(state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take State, so state is handed over explicitly
    let logged = || from_fn_with_state(state.clone(), verify_logged_user);
    let admin = || from_fn_with_state(state.clone(), verify_admin);

    let auth = Router::new()
        .route("/register", post(register))
        .route("/auth", post(login));

    let users = Router::new()
        .route("/users", get(list_users).route_layer(admin()))
        .route(
            "/user/{id}",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .route_layer(logged()),
        )
        .route(
            "/user/email/{email}",
            get(get_user_by_email).route_layer(admin()),
        )
        .route("/user/{id}/block", put(block_user).route_layer(admin()))
        .route("/user/{id}/unblock", put(unblock_user).route_layer(admin()))
        .route("/user/{id}/role", put(change_role).route_layer(admin()))
        .route(
            "/user/{id}/password",
            put(change_password).route_layer(logged()),
        );

    let posts = Router::new()
        .route(
            "/posts",
            get(list_posts).merge(post(create_post).route_layer(logged())),
        )
        .route("/posts/current-year", get(posts_current_year))
        .route("/posts/current-month", get(posts_current_month))
        .route("/posts/filter", get(filter_posts))
        .route("/posts/archive/{year}/{month}", get(posts_by_year_month))
        .route("/posts/author/{author_id}", get(posts_by_author))
        .route("/posts/title/{title}", get(post_by_title))
        .route("/posts/category/{category}", get(posts_by_category))
        .route(
            "/posts/{id}",
            get(get_post).merge(
                put(update_post)
                    .delete(delete_post)
                    .route_layer(logged()),
            ),
        )
        .route("/posts/{id}/name", patch(rename_post).route_layer(logged()));

    let comments = Router::new()
        .route("/comments", post(create_comment).route_layer(logged()))
        .route("/comments/author/{author_id}", get(comments_by_author))
        .route("/comments/post/{post_id}", get(comments_by_post))
        .route(
            "/comments/{id}",
            get(get_comment).merge(
                put(update_comment)
                    .patch(update_comment)
                    .delete(delete_comment)
                    .route_layer(logged()),
            ),
        );

    let likes = Router::new()
        .route("/likes", post(create_like).route_layer(logged()))
        .route("/likes/post/{post_id}", get(likes_by_post))
        .route("/likes/user/{user_id}", get(likes_by_user))
        .route(
            "/likes/{id}",
            get(get_like).merge(delete(delete_like).route_layer(logged())),
        );

    Router::new()
        .route("/health", get(health))
        .merge(auth)
        .merge(users)
        .merge(posts)
        .merge(comments)
        .merge(likes)
}
