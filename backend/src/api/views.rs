//! Server-rendered HTML for the public pages.
//!
//! The landing form is small enough that the markup is assembled directly;
//! submitted values are escaped and echoed back so a rejected form keeps
//! the visitor's input.

use crate::domain::{City, FieldErrors, FitnessGoal, FormField, Role, SignUpForm};

/// Escape text for use in HTML content and attribute values.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn field_error(out: &mut String, errors: &FieldErrors, field: FormField) {
    if let Some(message) = errors.get(field) {
        out.push_str("<p class=\"field-error\">");
        out.push_str(&escape_html(message));
        out.push_str("</p>\n");
    }
}

fn text_input(out: &mut String, name: &str, label: &str, value: &str, input_type: &str) {
    out.push_str(&format!(
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"{input_type}\" id=\"{name}\" name=\"{name}\" value=\"{}\">\n",
        escape_html(value)
    ));
}

fn select<T: Copy + std::fmt::Display>(
    out: &mut String,
    name: &str,
    label: &str,
    options: &[T],
    labels: impl Fn(T) -> &'static str,
    selected: &str,
) {
    out.push_str(&format!(
        "<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n\
         <option value=\"\"></option>\n"
    ));
    for option in options {
        let code = option.to_string();
        let marker = if code == selected { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{code}\"{marker}>{}</option>\n",
            labels(*option)
        ));
    }
    out.push_str("</select>\n");
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"fa\" dir=\"rtl\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }}\n\
         label {{ display: block; margin-top: 1rem; }}\n\
         input, select {{ width: 100%; padding: .4rem; }}\n\
         .field-error {{ color: #b00020; margin: .2rem 0; }}\n\
         button {{ margin-top: 1.5rem; padding: .5rem 2rem; }}\n\
         </style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Render the landing page with the sign-up form.
///
/// `form` carries the previously submitted raw values (empty on GET) and
/// `errors` the field messages from a rejected submission.
pub fn landing_page(form: &SignUpForm, errors: &FieldErrors, total_sign_ups: i64) -> String {
    let mut body = String::new();
    body.push_str("<h1>به‌زودی راه‌اندازی می‌شویم</h1>\n");
    body.push_str(
        "<p>برای اطلاع از راه‌اندازی اپلیکیشن، پیش‌ثبت‌نام کنید.</p>\n",
    );
    body.push_str(&format!(
        "<p class=\"signup-count\">تاکنون {total_sign_ups} نفر ثبت‌نام کرده‌اند.</p>\n"
    ));

    // action="" keeps the query string, so UTM tags survive the POST.
    body.push_str("<form method=\"post\" action=\"\">\n");

    text_input(&mut body, "full_name", "نام کامل", &form.full_name, "text");
    field_error(&mut body, errors, FormField::FullName);

    text_input(
        &mut body,
        "phone_number",
        "شماره تماس",
        &form.phone_number,
        "tel",
    );
    field_error(&mut body, errors, FormField::PhoneNumber);

    text_input(&mut body, "email", "ایمیل (اختیاری)", &form.email, "email");
    field_error(&mut body, errors, FormField::Email);

    select(&mut body, "city", "شهر", City::ALL, City::label, &form.city);
    field_error(&mut body, errors, FormField::City);

    select(
        &mut body,
        "fitness_goal",
        "هدف شما از استفاده",
        FitnessGoal::ALL,
        FitnessGoal::label,
        &form.fitness_goal,
    );
    field_error(&mut body, errors, FormField::FitnessGoal);

    select(&mut body, "role", "نقش شما", Role::ALL, Role::label, &form.role);
    field_error(&mut body, errors, FormField::Role);

    let checked = if form.consent { " checked" } else { "" };
    body.push_str(&format!(
        "<label><input type=\"checkbox\" name=\"consent\"{checked}> \
         با دریافت اطلاعات مربوط به راه‌اندازی اپ موافقم</label>\n"
    ));
    field_error(&mut body, errors, FormField::Consent);

    body.push_str("<button type=\"submit\">ثبت‌نام</button>\n</form>\n");

    page("به‌زودی", &body)
}

/// Render the static confirmation page shown after a successful sign-up.
pub fn success_page() -> String {
    page(
        "ثبت‌نام شد",
        "<h1>ثبت‌نام شما با موفقیت انجام شد!</h1>\n\
         <p>به محض راه‌اندازی اپلیکیشن به شما خبر می‌دهیم.</p>\n\
         <p><a href=\"/\">بازگشت به صفحهٔ اصلی</a></p>\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::MSG_CONSENT_REQUIRED;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("<b>&\"'", "&lt;b&gt;&amp;&quot;&#39;")]
    fn html_is_escaped(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_html(input), expected);
    }

    #[rstest]
    fn empty_form_renders_count_and_all_choices() {
        let html = landing_page(&SignUpForm::default(), &FieldErrors::default(), 42);
        assert!(html.contains("تاکنون 42 نفر"));
        assert!(html.contains("تهران"));
        assert!(html.contains("سایر شهرها"));
        assert!(html.contains("کاهش وزن"));
        assert!(html.contains("باشگاه"));
        assert!(!html.contains("field-error\">"));
    }

    #[rstest]
    fn rejected_form_echoes_values_and_messages() {
        let form = SignUpForm {
            full_name: "Ali <script>".to_owned(),
            phone_number: "123".to_owned(),
            city: "SHIRAZ".to_owned(),
            ..SignUpForm::default()
        };
        let mut errors = FieldErrors::default();
        errors.push(FormField::Consent, MSG_CONSENT_REQUIRED);

        let html = landing_page(&form, &errors, 0);

        assert!(html.contains("value=\"Ali &lt;script&gt;\""));
        assert!(html.contains("value=\"123\""));
        assert!(html.contains("<option value=\"SHIRAZ\" selected>"));
        assert!(html.contains(MSG_CONSENT_REQUIRED));
    }

    #[rstest]
    fn success_page_confirms_the_sign_up() {
        assert!(success_page().contains("ثبت‌نام شما با موفقیت انجام شد!"));
    }
}
