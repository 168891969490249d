//! Page Rendering
//!
//! Every page is assembled as a plain string. Anything that originated as
//! user input goes through `escape` on its way into markup.

use crate::credentials::{Role, UserSummary};
use axum::response::Html;

/// Image files offered on the members page, served from the static directory
pub const MEMBER_IMAGES: [&str; 2] = ["/minion.png", "/minion2.png"];

/// Replace HTML metacharacters so user input cannot become markup
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>",
        escape(title),
        body
    ))
}

/// Landing page
pub fn landing() -> Html<String> {
    page(
        "Clubhouse",
        "<h1>Hello friend!</h1>\n\
         <form action=\"/signup\" method=\"get\"><button>Sign up</button></form>\n\
         <form action=\"/login\" method=\"get\"><button>Log in</button></form>",
    )
}

/// Account creation form
pub fn signup_form() -> Html<String> {
    page(
        "Sign up",
        "<h1>Create an account</h1>\n\
         <form action=\"/submitUser\" method=\"post\">\n\
         <input name=\"name\" type=\"text\" placeholder=\"name\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"password\">\n\
         <button>Submit</button>\n\
         </form>",
    )
}

/// Login form
pub fn login_form() -> Html<String> {
    page(
        "Log in",
        "<h1>Log in</h1>\n\
         <form action=\"/loggingin\" method=\"post\">\n\
         <input name=\"name\" type=\"text\" placeholder=\"name\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"password\">\n\
         <button>Submit</button>\n\
         </form>",
    )
}

/// Generic failed-login page, identical for every failure cause
pub fn try_again() -> Html<String> {
    page(
        "Try again",
        "<h1>Invalid name/password combination.</h1>\n<a href=\"/login\">Try again</a>",
    )
}

/// Post-login confirmation page
pub fn logged_in() -> Html<String> {
    page(
        "Logged in",
        "<h1>You are logged in!</h1>\n\
         <form action=\"/members\" method=\"get\"><button>Go to Members Area</button></form>\n\
         <form action=\"/logout\" method=\"get\"><button>Log out</button></form>",
    )
}

/// Members page with a greeting and one of the rotating images
pub fn members(identifier: &str, image: &str) -> Html<String> {
    page(
        "Members",
        &format!(
            "<h1>Hello, {}.</h1>\n\
             <img src=\"{}\" alt=\"members only\">\n\
             <form action=\"/logout\" method=\"get\"><button>Sign out</button></form>",
            escape(identifier),
            image
        ),
    )
}

/// Post-logout page
pub fn signed_out() -> Html<String> {
    page(
        "Logged out",
        "<h1>You are logged out.</h1>\n\
         <form action=\"/login\" method=\"get\"><button>Log back in</button></form>",
    )
}

/// Admin overview listing every account with role controls
pub fn admin(users: &[UserSummary]) -> Html<String> {
    let mut rows = String::new();
    for user in users {
        let identifier = escape(&user.identifier);
        let control = match user.role {
            Role::Admin => format!(
                "<form action=\"/demote/{}\" method=\"post\"><button>Demote</button></form>",
                identifier
            ),
            Role::User => format!(
                "<form action=\"/promote/{}\" method=\"post\"><button>Promote</button></form>",
                identifier
            ),
        };
        rows.push_str(&format!(
            "<li>{} ({}) {}</li>\n",
            identifier, user.role, control
        ));
    }

    page(
        "Admin",
        &format!("<h1>Admin</h1>\n<ul>\n{}</ul>", rows),
    )
}

/// Contact form, with a hint once a submission came back empty
pub fn contact(missing_email: bool) -> Html<String> {
    let hint = if missing_email {
        "<p>email is required</p>\n"
    } else {
        ""
    };
    page(
        "Contact",
        &format!(
            "<h1>Contact us</h1>\n{}\
             <form action=\"/submitEmail\" method=\"post\">\n\
             <input name=\"email\" type=\"text\" placeholder=\"email address\">\n\
             <button>Submit</button>\n\
             </form>",
            hint
        ),
    )
}

/// Confirmation for a submitted contact email
pub fn email_submitted(email: &str) -> Html<String> {
    page(
        "Thanks",
        &format!("<h1>Thanks for subscribing with your email: {}</h1>", escape(email)),
    )
}

/// Validation failure with a link back to the form
pub fn validation_error(message: &str, retry_href: &str) -> Html<String> {
    page(
        "Invalid input",
        &format!(
            "<h1>{}</h1>\n<a href=\"{}\">Try again</a>",
            escape(message),
            retry_href
        ),
    )
}

/// Signup rejection for an identifier that is already taken
pub fn identifier_taken(identifier: &str) -> Html<String> {
    page(
        "Name taken",
        &format!(
            "<h1>The name {} is already taken.</h1>\n<a href=\"/signup\">Try another</a>",
            escape(identifier)
        ),
    )
}

/// Admin action against an account that does not exist
pub fn unknown_account(identifier: &str) -> Html<String> {
    page(
        "No such account",
        &format!(
            "<h1>No account named {}.</h1>\n<a href=\"/admin\">Back</a>",
            escape(identifier)
        ),
    )
}

/// Authenticated but not privileged enough
pub fn forbidden() -> Html<String> {
    page(
        "Not authorized",
        "<h1>403 - Not Authorized</h1>\n<a href=\"/members\">Back to members</a>",
    )
}

/// Catch-all page for unmatched routes
pub fn not_found() -> Html<String> {
    page("404", "<h1>Page not found - 404</h1>")
}

/// Generic failure page, deliberately detail-free
pub fn server_error() -> Html<String> {
    page(
        "Error",
        "<h1>Something went wrong on our side.</h1>\n<a href=\"/\">Home</a>",
    )
}

/// Usage hint for the injection demonstration route
pub fn injection_usage() -> Html<String> {
    page(
        "Injection demo",
        "<h3>no user provided - try /nosql-injection?user=name</h3>\n\
         <h3>or /nosql-injection?user[$ne]=name to simulate an attack</h3>",
    )
}

/// Shown when the injection demonstration catches hostile input
pub fn injection_blocked() -> Html<String> {
    page(
        "Blocked",
        "<h1 style=\"color:darkred;\">A NoSQL injection attack was detected!!</h1>",
    )
}

/// Greeting for a well-formed lookup on the injection demonstration route
pub fn injection_greeting(identifier: &str) -> Html<String> {
    page(
        "Injection demo",
        &format!("<h1>Hello {}</h1>", escape(identifier)),
    )
}
