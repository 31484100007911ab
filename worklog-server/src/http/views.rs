//! HTML pages
//!
//! Small string templates. Every value that came from a user or the database
//! passes through `escape` before it is written into markup.

use std::fmt::Write as _;

use axum::response::Html;
use chrono::NaiveDate;

use crate::db::{AdminLog, UserOverview};
use crate::journal::{EntryView, SummaryView};

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape and keep line breaks visible.
fn multiline(s: &str) -> String {
    escape(s).replace('\n', "<br>\n")
}

fn opt(s: &Option<String>) -> String {
    s.as_deref().map(escape).unwrap_or_default()
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(msg) => format!(r#"<p class="error">{}</p>"#, escape(msg)),
        None => String::new(),
    }
}

/// Which navigation bar to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Anonymous,
    User,
    Admin,
}

fn nav(nav: Nav) -> &'static str {
    match nav {
        Nav::Anonymous => r#"<nav><a href="/">Home</a> <a href="/login">Log in</a> <a href="/signup">Sign up</a></nav>"#,
        Nav::User => r#"<nav><a href="/">Journal</a> <a href="/summaries">Summaries</a> <a href="/logout">Log out</a></nav>"#,
        Nav::Admin => r#"<nav><a href="/admin">Users</a> <a href="/admin/audit-logs">Audit log</a> <form method="post" action="/admin-logout" class="inline"><button type="submit">Leave admin</button></form></nav>"#,
    }
}

pub fn layout(title: &str, nav_kind: Nav, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Worklog</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
{nav}
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        nav = nav(nav_kind),
        body = body,
    ))
}

pub fn landing() -> Html<String> {
    layout(
        "Worklog",
        Nav::Anonymous,
        r#"<p>Keep a short daily record of your work and get a weekly summary of it.</p>
<p><a href="/login">Log in</a> or <a href="/signup">create an account</a>.</p>"#,
    )
}

pub fn login_page(error: Option<&str>, username: &str) -> Html<String> {
    let body = format!(
        r#"{error}
<form method="post" action="/login">
<label>Username <input name="username" value="{username}" required autofocus></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/signup">Sign up</a>.</p>"#,
        error = error_banner(error),
        username = escape(username),
    );
    layout("Log in", Nav::Anonymous, &body)
}

/// Values echoed back into a signup form after a failed attempt
#[derive(Debug, Default, Clone)]
pub struct SignupValues<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
}

fn contact_fields(values: &SignupValues<'_>) -> String {
    format!(
        r#"<label>First name <input name="first_name" value="{}"></label>
<label>Last name <input name="last_name" value="{}"></label>
<label>Email <input name="email" type="email" value="{}"></label>
<label>Phone <input name="phone_number" type="tel" value="{}"></label>"#,
        escape(values.first_name),
        escape(values.last_name),
        escape(values.email),
        escape(values.phone_number),
    )
}

const PASSWORD_HINT: &str = "At least 8 characters, with an uppercase letter, a lowercase letter, a number and a special character.";

pub fn signup_page(error: Option<&str>, values: &SignupValues<'_>) -> Html<String> {
    let body = format!(
        r#"{error}
<form method="post" action="/signup">
<label>Username <input name="username" value="{username}" required autofocus></label>
<label>Password <input name="password" type="password" required></label>
<p class="hint">{hint}</p>
{contact}
<button type="submit">Create account</button>
</form>
<p>Already registered? <a href="/login">Log in</a>.</p>"#,
        error = error_banner(error),
        username = escape(values.username),
        hint = PASSWORD_HINT,
        contact = contact_fields(values),
    );
    layout("Sign up", Nav::Anonymous, &body)
}

pub fn index_page(
    username: &str,
    entries: &[EntryView],
    today: NaiveDate,
    error: Option<&str>,
) -> Html<String> {
    let mut body = format!(
        r#"<p>Signed in as <strong>{user}</strong>.</p>
{error}
<form method="post" action="/log">
<label>Date <input name="log_date" type="date" value="{today}" required></label>
<label>What did you work on? <textarea name="entry" rows="5" required></textarea></label>
<button type="submit">Save entry</button>
</form>
<form method="post" action="/generate-summary">
<button type="submit">Generate this week's summary</button>
</form>
<h2>Entries</h2>
"#,
        user = escape(username),
        error = error_banner(error),
        today = today.format("%Y-%m-%d"),
    );

    if entries.is_empty() {
        body.push_str("<p>No entries yet.</p>");
    } else {
        body.push_str("<ul class=\"entries\">\n");
        for entry in entries {
            let _ = writeln!(
                body,
                "<li><time>{}</time><div>{}</div></li>",
                entry.log_date.format("%Y-%m-%d"),
                multiline(&entry.text)
            );
        }
        body.push_str("</ul>");
    }

    layout("Your journal", Nav::User, &body)
}

pub fn summaries_page(summaries: &[SummaryView], error: Option<&str>) -> Html<String> {
    let mut body = error_banner(error);

    if summaries.is_empty() {
        body.push_str("<p>No summaries yet.</p>\n");
    } else {
        for summary in summaries {
            let _ = writeln!(
                body,
                "<article><h2>{} to {}</h2><div>{}</div></article>",
                summary.week_start.format("%Y-%m-%d"),
                summary.week_end.format("%Y-%m-%d"),
                multiline(&summary.text)
            );
        }
    }

    body.push_str(
        r#"<h2>Write your own</h2>
<form method="post" action="/submit-summary">
<label>Week start <input name="week_start" type="date" required></label>
<label>Week end <input name="week_end" type="date" required></label>
<label>Summary <textarea name="summary" rows="8" required></textarea></label>
<button type="submit">Save summary</button>
</form>"#,
    );

    layout("Weekly summaries", Nav::User, &body)
}

pub fn admin_login_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        r#"{error}
<form method="post" action="/admin-login">
<label>Username <input name="username" required autofocus></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>"#,
        error = error_banner(error),
    );
    layout("Admin log in", Nav::Anonymous, &body)
}

pub fn admin_signup_page(error: Option<&str>, values: &SignupValues<'_>) -> Html<String> {
    let body = format!(
        r#"{error}
<form method="post" action="/admin-signup">
{contact}
<label>Username <input name="username" value="{username}" required></label>
<label>Password <input name="password" type="password" required></label>
<p class="hint">{hint}</p>
<button type="submit">Create admin account</button>
</form>"#,
        error = error_banner(error),
        contact = contact_fields(values),
        username = escape(values.username),
        hint = PASSWORD_HINT,
    );
    layout("Admin sign up", Nav::Anonymous, &body)
}

pub fn admin_home(admin: &str) -> Html<String> {
    let body = format!(
        r#"<p>Signed in as <strong>{}</strong>.</p>
<ul>
<li><a href="/admin">Users</a></li>
<li><a href="/admin/audit-logs">Audit log</a></li>
<li><a href="/admin-signup">Add an administrator</a></li>
</ul>"#,
        escape(admin)
    );
    layout("Administration", Nav::Admin, &body)
}

pub fn admin_dashboard(admin: &str, users: &[UserOverview]) -> Html<String> {
    let mut body = String::from(
        "<table>\n<thead><tr><th>Username</th><th>Name</th><th>Email</th><th>Phone</th>\
         <th>Entries</th><th>Status</th><th></th></tr></thead>\n<tbody>\n",
    );

    for user in users {
        let name = [&user.first_name, &user.last_name]
            .into_iter()
            .map(opt)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let status = match (user.is_active, user.is_admin) {
            (true, true) => "active (admin)",
            (true, false) => "active",
            (false, _) => "deactivated",
        };
        let action = if user.username == admin {
            String::new()
        } else if user.is_active {
            format!(
                r#"<form method="post" action="/admin/deactivate/{}"><button type="submit">Deactivate</button></form>"#,
                escape(&user.username)
            )
        } else {
            format!(
                r#"<form method="post" action="/admin/reactivate/{}"><button type="submit">Reactivate</button></form>"#,
                escape(&user.username)
            )
        };

        let _ = writeln!(
            body,
            r#"<tr><td><a href="/admin/user-logs/{u}">{u}</a></td><td>{name}</td><td>{email}</td><td>{phone}</td><td>{count}</td><td>{status}</td><td>{action}</td></tr>"#,
            u = escape(&user.username),
            name = name,
            email = opt(&user.email),
            phone = opt(&user.phone_number),
            count = user.log_count,
            status = status,
            action = action,
        );
    }

    body.push_str("</tbody>\n</table>");
    layout("Users", Nav::Admin, &body)
}

pub fn admin_user_logs(username: &str, entries: &[EntryView]) -> Html<String> {
    let mut body = String::new();
    if entries.is_empty() {
        body.push_str("<p>This user has no entries.</p>");
    } else {
        body.push_str("<ul class=\"entries\">\n");
        for entry in entries {
            let _ = writeln!(
                body,
                "<li><time>{}</time><div>{}</div></li>",
                entry.log_date.format("%Y-%m-%d"),
                multiline(&entry.text)
            );
        }
        body.push_str("</ul>");
    }
    layout(&format!("Entries for {}", username), Nav::Admin, &body)
}

pub fn audit_logs_page(logs: &[AdminLog]) -> Html<String> {
    let mut body = String::from(
        "<table>\n<thead><tr><th>When</th><th>Admin</th><th>Action</th><th>User</th></tr></thead>\n<tbody>\n",
    );
    for log in logs {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            log.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            escape(&log.admin_username),
            escape(&log.action),
            escape(&log.target_user),
        );
    }
    body.push_str("</tbody>\n</table>");
    layout("Audit log", Nav::Admin, &body)
}

pub fn error_page(title: &str, message: &str) -> Html<String> {
    let body = format!(
        r#"<p class="error">{}</p>
<p><a href="/">Back to the journal</a></p>"#,
        escape(message)
    );
    layout(title, Nav::Anonymous, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<b onclick='x()'>"Tom & Jerry"</b>"#),
            "&lt;b onclick=&#x27;x()&#x27;&gt;&quot;Tom &amp; Jerry&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn entries_are_escaped() {
        let entries = vec![EntryView {
            log_date: date(10),
            text: "<script>alert(1)</script>\nsecond line".into(),
        }];
        let Html(page) = index_page("alice", &entries, date(12), None);
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;<br>"));
        assert!(page.contains(r#"value="2024-06-12""#));
    }

    #[test]
    fn login_echoes_escaped_username() {
        let Html(page) = login_page(Some("Invalid username or password."), r#"a"><x"#);
        assert!(page.contains("Invalid username or password."));
        assert!(page.contains(r#"value="a&quot;&gt;&lt;x""#));
    }

    #[test]
    fn dashboard_hides_self_toggle() {
        let users = vec![
            UserOverview {
                username: "root".into(),
                first_name: Some("Ada".into()),
                last_name: None,
                email: None,
                phone_number: None,
                is_admin: true,
                is_active: true,
                log_count: 0,
            },
            UserOverview {
                username: "bob".into(),
                first_name: None,
                last_name: None,
                email: Some("bob@example.com".into()),
                phone_number: None,
                is_admin: false,
                is_active: false,
                log_count: 3,
            },
        ];
        let Html(page) = admin_dashboard("root", &users);
        assert!(!page.contains("/admin/deactivate/root"));
        assert!(page.contains("/admin/reactivate/bob"));
        assert!(page.contains("<td>3</td>"));
        assert!(page.contains("deactivated"));
    }

    #[test]
    fn empty_states() {
        let Html(page) = summaries_page(&[], None);
        assert!(page.contains("No summaries yet."));
        let Html(page) = admin_user_logs("bob", &[]);
        assert!(page.contains("This user has no entries."));
    }
}
