// Mail body composition for guest confirmations and hotel notifications.
//
// Everything here is a pure function of the sanitized booking, the generated
// booking id and (for the hotel notification only) the received-at timestamp.
// The text and HTML confirmation variants carry identical factual content;
// only formatting differs.

use chrono::{DateTime, NaiveDate, Utc};

use crate::booking::Booking;

pub const HOTEL_DISPLAY_NAME: &str = "Hotel Boss";
pub const HOTEL_ADDRESS: &str = "123 Main Street, City Center";
pub const HOTEL_PHONE: &str = "+1 (555) 123-4567";
pub const HOTEL_CONTACT_EMAIL: &str = "info@hoteleurope.com";
pub const CHECK_IN_TIME: &str = "3:00 PM";
pub const CHECK_OUT_TIME: &str = "12:00 PM";

const AMENITIES: [&str; 5] = [
    "Complimentary high-speed Wi-Fi",
    "Daily housekeeping service",
    "24/7 front desk assistance",
    "Free parking for registered guests",
    "Access to fitness center and business center",
];

const POLICIES: [&str; 4] = [
    "Please bring a valid ID for check-in",
    "Early check-in and late check-out available (additional charges may apply)",
    "Free cancellation up to 24 hours before arrival",
    "Children under 12 stay free when sharing with parents",
];

/// Checkout derived with calendar arithmetic, so month and year boundaries
/// are crossed correctly (2024-01-30 + 3 nights is 2024-02-02).
pub fn checkout_date(arrival: NaiveDate, nights: u32) -> NaiveDate {
    arrival + chrono::Days::new(u64::from(nights))
}

/// Fixed display table for known room codes; unknown codes pass through
/// verbatim. Unreachable behind the validator, kept as a deliberate fallback.
pub fn room_type_display(code: &str) -> &str {
    match code {
        "standard" => "Standard Room - €80/night",
        "deluxe" => "Deluxe Room - €120/night",
        "suite" => "Executive Suite - €200/night",
        "family" => "Family Room - €150/night",
        other => other,
    }
}

// "Monday, January 30, 2024"
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn guest_subject(booking_id: &str) -> String {
    format!(
        "Booking Confirmation - {} - {}",
        booking_id, HOTEL_DISPLAY_NAME
    )
}

pub fn hotel_notification_subject(booking_id: &str) -> String {
    format!("New Booking Received - {}", booking_id)
}

/// Plain-text guest confirmation body.
pub fn guest_text(booking: &Booking, booking_id: &str, checkout: NaiveDate) -> String {
    let mut body = format!(
        "Dear {name},\n\n\
         Thank you for choosing {hotel}! We're delighted to confirm your reservation.\n\n\
         BOOKING CONFIRMATION\n\
         Booking ID: {id}\n\
         Guest Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\n\
         RESERVATION DETAILS\n\
         Check-in: {check_in} ({check_in_time})\n\
         Check-out: {check_out} ({check_out_time})\n\
         Nights: {nights}\n\
         Room Type: {room}\n\
         Guests: {guests}\n",
        name = booking.name,
        hotel = HOTEL_DISPLAY_NAME,
        id = booking_id,
        email = booking.email,
        phone = booking.phone.as_deref().unwrap_or("N/A"),
        check_in = format_display_date(booking.arrival_date),
        check_in_time = CHECK_IN_TIME,
        check_out = format_display_date(checkout),
        check_out_time = CHECK_OUT_TIME,
        nights = booking.nights,
        room = room_type_display(booking.room_type.as_str()),
        guests = booking.guests,
    );

    if let Some(requests) = booking.special_requests.as_deref() {
        body.push_str(&format!("\nSpecial Requests: {}\n", requests));
    }

    body.push_str("\nWHAT'S INCLUDED\n");
    for amenity in AMENITIES {
        body.push_str(&format!("- {}\n", amenity));
    }

    body.push_str("\nIMPORTANT INFORMATION\n");
    for policy in POLICIES {
        body.push_str(&format!("- {}\n", policy));
    }

    body.push_str(&format!(
        "\nWe look forward to welcoming you to {hotel}!\n\n\
         Best regards,\n\
         The {hotel} Team\n\n\
         {hotel}\n\
         {address}\n\
         Phone: {phone}\n\
         Email: {email}\n",
        hotel = HOTEL_DISPLAY_NAME,
        address = HOTEL_ADDRESS,
        phone = HOTEL_PHONE,
        email = HOTEL_CONTACT_EMAIL,
    ));

    body
}

/// HTML guest confirmation body; same facts as the text variant.
pub fn guest_html(booking: &Booking, booking_id: &str, checkout: NaiveDate) -> String {
    let special_requests = booking
        .special_requests
        .as_deref()
        .map(|requests| {
            format!(
                r#"<div style="margin-top: 15px; background: #fff3cd; border-radius: 5px; padding: 15px;">
            <h4 style="margin: 0 0 8px 0;">Special Requests:</h4>
            <p style="margin: 0;">{}</p>
        </div>"#,
                requests
            )
        })
        .unwrap_or_default();

    let amenities: String = AMENITIES
        .iter()
        .map(|amenity| format!("<li>{}</li>", amenity))
        .collect();
    let policies: String = POLICIES
        .iter()
        .map(|policy| format!("<li>{}</li>", policy))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Booking Confirmation - {hotel}</title>
</head>
<body style="font-family: 'Segoe UI', Tahoma, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: #1e3c72; color: white; padding: 30px 20px; text-align: center; border-radius: 10px 10px 0 0;">
        <h1 style="margin: 0;">{hotel}</h1>
        <p style="margin: 10px 0 0 0;">Booking Confirmation</p>
    </div>
    <div style="background: white; padding: 30px 20px; border: 1px solid #e0e0e0; border-top: none;">
        <h2 style="color: #1e3c72;">Dear {name},</h2>
        <p>Thank you for choosing {hotel}! We're delighted to confirm your reservation.</p>
        <div style="background: #f8f9fa; border-left: 4px solid #1e3c72; padding: 15px; margin: 20px 0;">
            <h3 style="margin: 0 0 5px 0; color: #1e3c72;">Booking Confirmation ID</h3>
            <p style="margin: 0; font-size: 20px; font-weight: bold;">{id}</p>
        </div>
        <h3 style="color: #1e3c72;">Guest Information</h3>
        <table style="width: 100%;">
            <tr><td style="font-weight: bold;">Name:</td><td>{name}</td></tr>
            <tr><td style="font-weight: bold;">Email:</td><td>{email}</td></tr>
            <tr><td style="font-weight: bold;">Phone:</td><td>{phone}</td></tr>
        </table>
        <h3 style="color: #1e3c72;">Reservation Details</h3>
        <table style="width: 100%;">
            <tr><td style="font-weight: bold;">Check-in:</td><td>{check_in} ({check_in_time})</td></tr>
            <tr><td style="font-weight: bold;">Check-out:</td><td>{check_out} ({check_out_time})</td></tr>
            <tr><td style="font-weight: bold;">Nights:</td><td>{nights}</td></tr>
            <tr><td style="font-weight: bold;">Room Type:</td><td>{room}</td></tr>
            <tr><td style="font-weight: bold;">Guests:</td><td>{guests}</td></tr>
        </table>
        {special_requests}
        <div style="background: #e8f5e8; border-radius: 8px; padding: 20px; margin: 25px 0;">
            <h3 style="color: #2e7d32; margin-top: 0;">What's Included</h3>
            <ul style="color: #2e7d32;">{amenities}</ul>
        </div>
        <div style="background: #e3f2fd; border-radius: 8px; padding: 20px; margin: 25px 0;">
            <h3 style="color: #1565c0; margin-top: 0;">Important Information</h3>
            <ul style="color: #1565c0;">{policies}</ul>
        </div>
        <div style="text-align: center; margin: 30px 0;">
            <p>We look forward to welcoming you to {hotel}!</p>
            <p style="margin: 5px 0; color: #666;">{address}<br>{contact_phone}<br>{contact_email}</p>
        </div>
    </div>
    <div style="background: #1a1a1a; color: #ccc; padding: 20px; text-align: center; border-radius: 0 0 10px 10px;">
        <p style="margin: 0;">Best regards,<br><strong>The {hotel} Team</strong></p>
        <p style="margin: 10px 0 0 0; font-size: 12px; color: #999;">This is an automated confirmation email. Please do not reply directly to this message.</p>
    </div>
</body>
</html>"#,
        hotel = HOTEL_DISPLAY_NAME,
        name = booking.name,
        id = booking_id,
        email = booking.email,
        phone = booking.phone.as_deref().unwrap_or("N/A"),
        check_in = format_display_date(booking.arrival_date),
        check_in_time = CHECK_IN_TIME,
        check_out = format_display_date(checkout),
        check_out_time = CHECK_OUT_TIME,
        nights = booking.nights,
        room = room_type_display(booking.room_type.as_str()),
        guests = booking.guests,
        special_requests = special_requests,
        amenities = amenities,
        policies = policies,
        address = HOTEL_ADDRESS,
        contact_phone = HOTEL_PHONE,
        contact_email = HOTEL_CONTACT_EMAIL,
    )
}

/// HTML notification sent to the hotel's internal address.
pub fn hotel_notification_html(
    booking: &Booking,
    booking_id: &str,
    received_at: DateTime<Utc>,
) -> String {
    let special_requests = booking
        .special_requests
        .as_deref()
        .map(|requests| {
            format!(
                r#"<div style="margin-top: 20px; background: #fff3cd; border-left: 4px solid #ffc107; padding: 15px;">
            <h4 style="margin: 0 0 10px 0;">Special Requests:</h4>
            <p style="margin: 0;">{}</p>
        </div>"#,
                requests
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>New Booking - {id}</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: #dc3545; color: white; padding: 20px; text-align: center; border-radius: 8px 8px 0 0;">
        <h2 style="margin: 0;">New Booking Alert</h2>
        <p style="margin: 10px 0 0 0;">Booking ID: {id}</p>
    </div>
    <div style="background: white; border: 1px solid #e0e0e0; border-top: none; padding: 20px;">
        <h3>Booking Details</h3>
        <table style="width: 100%; border-collapse: collapse;">
            <tr><td style="font-weight: bold;">Name:</td><td>{name}</td></tr>
            <tr><td style="font-weight: bold;">Email:</td><td>{email}</td></tr>
            <tr><td style="font-weight: bold;">Phone:</td><td>{phone}</td></tr>
            <tr><td style="font-weight: bold;">Arrival:</td><td>{arrival}</td></tr>
            <tr><td style="font-weight: bold;">Nights:</td><td>{nights}</td></tr>
            <tr><td style="font-weight: bold;">Room Type:</td><td>{room}</td></tr>
            <tr><td style="font-weight: bold;">Guests:</td><td>{guests}</td></tr>
        </table>
        {special_requests}
        <p style="margin-top: 20px; font-size: 14px; color: #666;">Booking received at: {received_at}</p>
    </div>
</body>
</html>"#,
        id = booking_id,
        name = booking.name,
        email = booking.email,
        phone = booking.phone.as_deref().unwrap_or("N/A"),
        arrival = format_display_date(booking.arrival_date),
        nights = booking.nights,
        room = room_type_display(booking.room_type.as_str()),
        guests = booking.guests,
        special_requests = special_requests,
        received_at = received_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
