use lilac_core::mailer::EmailMessage;

/// The "your booking page is live" email sent once onboarding has
/// persisted a slug.
#[derive(Debug, Clone)]
pub struct BookingLinkEmail {
    pub to: String,
    pub business_name: String,
    pub booking_link: String,
    pub owner_name: Option<String>,
}

impl BookingLinkEmail {
    /// Render the message for the configured sender address.
    pub fn render(&self, from: &str) -> EmailMessage {
        let greeting = match &self.owner_name {
            Some(name) if !name.trim().is_empty() => format!("Hello {}", name.trim()),
            _ => "Hello".to_string(),
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Your Booking Page is Live!</title>
</head>
<body style="margin:0;padding:0;font-family:Arial,sans-serif;background-color:#f3f4f6;">
  <div style="max-width:600px;margin:0 auto;padding:40px 20px;">
    <div style="background-color:#ffffff;border-radius:12px;overflow:hidden;">
      <div style="padding:40px;text-align:center;background:linear-gradient(135deg,#c084fc 0%,#a855f7 100%);">
        <h1 style="margin:0;color:#ffffff;font-size:26px;">Your Booking Page is Live!</h1>
        <p style="margin:15px 0 0;color:rgba(255,255,255,0.9);font-size:16px;">{business_name}</p>
      </div>
      <div style="padding:30px 40px;">
        <p style="margin:0 0 15px;color:#374151;font-size:16px;">{greeting},</p>
        <p style="margin:0 0 25px;color:#374151;font-size:16px;">
          Great news! Your online booking page for <strong>{business_name}</strong> is ready.
          Share the link below with your clients so they can book appointments 24/7.
        </p>
        <div style="text-align:center;margin-bottom:25px;">
          <a href="{booking_link}" style="display:inline-block;padding:14px 32px;background-color:#a855f7;color:#ffffff;text-decoration:none;border-radius:8px;font-weight:600;">
            Open Booking Page
          </a>
          <p style="margin:15px 0 0;font-size:14px;word-break:break-all;">
            <a href="{booking_link}" style="color:#7c3aed;">{booking_link}</a>
          </p>
        </div>
        <p style="margin:0;color:#6b7280;font-size:14px;text-align:center;">
          Tip: add this link to your Instagram bio, Facebook page, and Google Business listing to get more bookings.
        </p>
      </div>
      <div style="padding:25px 40px;background-color:#f9fafb;text-align:center;">
        <p style="margin:0;color:#6b7280;font-size:12px;">
          This is an automated email. Please do not reply.
        </p>
      </div>
    </div>
  </div>
</body>
</html>"#,
            business_name = self.business_name,
            greeting = greeting,
            booking_link = self.booking_link,
        );

        EmailMessage {
            to: self.to.trim().to_lowercase(),
            from: from.to_string(),
            subject: format!("Your Booking Page is Live - {}", self.business_name),
            html,
        }
    }
}
