use axum::response::Html;

use super::{Notice, escape, layout, render_notices, user_panel};
use crate::auth::{Role, UserInfo};

pub struct AdminView<'a> {
    pub username: &'a str,
    pub users: &'a [UserInfo],
    /// Account that cannot be deleted
    pub protected: &'a str,
    pub notices: Vec<Notice>,
}

pub fn admin_page(view: &AdminView<'_>) -> Html<String> {
    let rows: String = view
        .users
        .iter()
        .map(|user| {
            let name = escape(&user.username);
            let action = if user.username == view.protected {
                r#"<span class="muted">built-in</span>"#.to_string()
            } else {
                format!(
                    r#"<form method="post" action="/admin/users/{name}/delete"><button type="submit">Delete</button></form>"#
                )
            };
            format!(
                "<tr><td>{name}</td><td>{role}</td><td>{action}</td></tr>",
                role = user.role.as_str()
            )
        })
        .collect();

    let role_options: String = [Role::User, Role::Admin]
        .iter()
        .map(|r| format!(r#"<option value="{0}">{0}</option>"#, r.as_str()))
        .collect();

    let body = format!(
        r#"<main>
<aside>
{user_panel}
<section><a href="/">← Back to the studio</a></section>
</aside>
<div class="content">
{notices}
<section>
<h2>User Management</h2>
<table>
<thead><tr><th>Username</th><th>Role</th><th></th></tr></thead>
<tbody>{rows}</tbody>
</table>
</section>
<section>
<h3>Create User</h3>
<form method="post" action="/admin/users">
<label for="new-username">Username</label>
<input id="new-username" name="username" required>
<label for="new-password">Password</label>
<input id="new-password" name="password" type="password" required>
<label for="new-role">Role</label>
<select id="new-role" name="role">{role_options}</select>
<p><button type="submit">Create User</button></p>
</form>
</section>
</div>
</main>"#,
        user_panel = user_panel(view.username, true),
        notices = render_notices(&view.notices),
    );

    layout("User Management", &body)
}
