use chrono::{DateTime, Local};
use clap::Args;
use cleanquote::config::MailConfig;
use cleanquote::error::AppError;
use cleanquote::quotes::notification::{admin_notification, customer_notification};
use cleanquote::quotes::{compute_breakdown, CostBreakdown, QuoteRequest, QuoteSubmission};
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Property size in square feet
    #[arg(long)]
    pub(crate) size: f64,
    /// Cleaning type: basic, deep, or specialized
    #[arg(long)]
    pub(crate) cleaning_type: String,
    /// Service area: Queens or Nassau
    #[arg(long)]
    pub(crate) city: String,
    /// Requested cadence: daily, weekly, monthly, or one-time
    #[arg(long, default_value = "one-time")]
    pub(crate) frequency: String,
    /// Additional service (repeatable): windows, carpet, disinfection
    #[arg(long = "service")]
    pub(crate) services: Vec<String>,
    /// Client name used in the email preview
    #[arg(long, default_value = "Walk-in Client")]
    pub(crate) name: String,
    /// Client email used in the email preview
    #[arg(long, default_value = "client@example.com")]
    pub(crate) email: String,
    /// Property address used in the email preview
    #[arg(long, default_value = "Not provided")]
    pub(crate) address: String,
    /// Print the admin and customer email bodies as well
    #[arg(long)]
    pub(crate) preview_emails: bool,
}

impl EstimateArgs {
    fn into_submission(self) -> (QuoteSubmission, bool) {
        let submission = QuoteSubmission {
            client_name: self.name,
            email: self.email,
            address: self.address,
            city: self.city,
            property_size: self.size,
            cleaning_type: self.cleaning_type,
            service_frequency: self.frequency,
            additional_services: Some(self.services),
        };
        (submission, self.preview_emails)
    }
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let (submission, preview_emails) = args.into_submission();
    let request = submission.validate()?;
    let breakdown = compute_breakdown(&request);
    let preview_admin = if preview_emails {
        Some(MailConfig::admin_address_from_env()?)
    } else {
        None
    };

    print!(
        "{}",
        render_estimate(&request, &breakdown, preview_admin.as_deref(), Local::now())
    );
    Ok(())
}

pub(crate) fn render_estimate(
    request: &QuoteRequest,
    breakdown: &CostBreakdown,
    preview_admin: Option<&str>,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();
    writeln!(&mut out, "CleanQuote estimate").expect("write title");
    writeln!(
        &mut out,
        "{} sq ft, {} cleaning in {} ({})",
        request.property_size(),
        request.cleaning_type(),
        request.city(),
        request.service_frequency()
    )
    .expect("write summary");
    writeln!(&mut out, "Generated {}", generated_at.format("%Y-%m-%d %H:%M"))
        .expect("write timestamp");

    writeln!(&mut out, "\nBreakdown").expect("write breakdown heading");
    for (label, amount) in breakdown.components() {
        writeln!(&mut out, "- {label}: ${amount:.2}").expect("write component");
    }
    writeln!(&mut out, "Total Cost: ${:.2}", breakdown.total_cost()).expect("write total");

    if let Some(admin_address) = preview_admin {
        for notification in [
            admin_notification(request, breakdown, admin_address),
            customer_notification(request, breakdown),
        ] {
            writeln!(
                &mut out,
                "\n=== {} email to {} ===",
                notification.kind, notification.email.to
            )
            .expect("write email heading");
            writeln!(&mut out, "Subject: {}\n", notification.email.subject)
                .expect("write subject");
            out.push_str(&notification.email.text);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(preview_emails: bool) -> EstimateArgs {
        EstimateArgs {
            size: 5000.0,
            cleaning_type: "basic".to_string(),
            city: "Queens".to_string(),
            frequency: "weekly".to_string(),
            services: vec!["windows".to_string()],
            name: "Acme Corp".to_string(),
            email: "facilities@acme.test".to_string(),
            address: "123 Main St".to_string(),
            preview_emails,
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 3, 4, 9, 30, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn renders_breakdown_and_total() {
        let (submission, preview) = args(false).into_submission();
        let request = submission.validate().expect("valid");
        let breakdown = compute_breakdown(&request);

        assert!(!preview);
        let output = render_estimate(&request, &breakdown, None, fixed_time());
        assert!(output.contains("5000 sq ft, basic cleaning in Queens (weekly)"));
        assert!(output.contains("Generated 2025-03-04 09:30"));
        assert!(output.contains("- Overhead Cost: $127.50"));
        assert!(output.contains("- Travel Cost: $50.00"));
        assert!(output.contains("Total Cost: $1027.50"));
        assert!(!output.contains("email to"));
    }

    #[test]
    fn preview_includes_both_email_bodies() {
        let (submission, preview) = args(true).into_submission();
        let request = submission.validate().expect("valid");
        let breakdown = compute_breakdown(&request);

        assert!(preview);
        let output = render_estimate(&request, &breakdown, Some("ops@cleanquote.com"), fixed_time());
        assert!(output.contains("=== admin email to ops@cleanquote.com ==="));
        assert!(output.contains("Subject: New Cleaning Quote Request - Acme Corp"));
        assert!(output.contains("=== customer email to facilities@acme.test ==="));
        assert!(output.contains("Dear Acme Corp,"));
    }

    #[test]
    fn invalid_input_is_reported() {
        let mut invalid = args(false);
        invalid.city = "Brooklyn".to_string();
        assert!(matches!(
            run_estimate(invalid),
            Err(AppError::InvalidQuote(_))
        ));
    }
}
