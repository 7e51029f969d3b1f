//! Report generation tools
//!
//! Generate a monthly PDF report of meal completion with a summary, a per-day
//! table, and a completion chart.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{Local, NaiveDate};
use printpdf::*;
use serde::Serialize;

use super::stats::resolve_start_date;
use crate::db::Database;
use crate::models::MealKind;
use crate::stats::{monthly_breakdown, DayStats, MissCounts, MonthlyBreakdown, MEALS_PER_DAY};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (0, 112, 192);       // Blue for title
const COLOR_PERFECT: (u8, u8, u8) = (0, 176, 80);      // Green
const COLOR_PARTIAL: (u8, u8, u8) = (255, 165, 0);     // Orange
const COLOR_MISSED: (u8, u8, u8) = (255, 0, 0);        // Red
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub file_path: String,
    pub month: String,
    pub total_tracked_days: u32,
    pub perfect_days: u32,
    pub average_daily_score: u32,
    pub completion_rate: u32,
    pub message: String,
}

/// Color for a day's completed meal count
pub fn completion_color(completed: u32) -> (u8, u8, u8) {
    if completed >= MEALS_PER_DAY {
        COLOR_PERFECT
    } else if completed > 0 {
        COLOR_PARTIAL
    } else {
        COLOR_MISSED
    }
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month))
}

fn most_missed_label(miss_counts: &MissCounts) -> String {
    let top = miss_counts.top_missed();
    if top.is_empty() {
        "None".to_string()
    } else {
        top.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
    }
}

fn meal_mark(day: &DayStats, kind: MealKind) -> &'static str {
    let done = match kind {
        MealKind::Breakfast => day.breakfast,
        MealKind::Lunch => day.lunch,
        MealKind::Dinner => day.dinner,
    };
    if done { "Yes" } else { "No" }
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Generate the daily completion bar chart as PNG bytes
pub fn generate_completion_chart(breakdown: &MonthlyBreakdown, width: u32, height: u32) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;
    use plotters_bitmap::BitMapBackend;

    let days: Vec<&DayStats> = breakdown
        .per_day
        .values()
        .filter(|d| !d.before_start && !d.is_future)
        .collect();

    if days.is_empty() {
        return Err("No tracked days to chart".to_string());
    }

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let day_count = breakdown.per_day.len() as u32;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(1u32..(day_count + 1), 0u32..MEALS_PER_DAY)
            .map_err(|e| e.to_string())?;

        chart.configure_mesh()
            .x_labels(day_count.min(16) as usize)
            .y_labels(MEALS_PER_DAY as usize + 1)
            .x_desc("Day of month")
            .y_desc("Meals completed")
            .draw()
            .map_err(|e| e.to_string())?;

        chart.draw_series(days.iter().map(|d| {
            let day = chrono::Datelike::day(&d.date);
            let (r, g, b) = completion_color(d.completed);
            Rectangle::new([(day, 0), (day + 1, d.completed)], RGBColor(r, g, b).filled())
        })).map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    // Convert RGB buffer to PNG
    let img = ::image::RgbImage::from_raw(width, height, buffer)
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ::image::ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

// ============================================================================
// PDF Generation Helper Functions
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(
    layer: &PdfLayerReference,
    x1: Mm,
    y1: Mm,
    x2: Mm,
    y2: Mm,
    color: (u8, u8, u8),
    width: f32,
) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![
            (Point::new(x1, y1), false),
            (Point::new(x2, y2), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

// ============================================================================
// Monthly Report Generation
// ============================================================================

/// Generate a monthly meal completion PDF report
pub fn generate_monthly_report(
    db: &Database,
    year: i32,
    month: u32,
    output_path: &str,
    today: NaiveDate,
) -> Result<GenerateReportResponse, String> {
    if output_path.trim().is_empty() {
        return Err("output_path is required".to_string());
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| format!("Invalid month: {}-{:02}", year, month))?;

    let start_date = resolve_start_date(db, None, today)?;
    let breakdown = db
        .with_records(|records| Ok(monthly_breakdown(first, start_date, today, records.days())))
        .map_err(|e| format!("Database error: {}", e))?;

    let title_month = month_label(year, month);

    // Create PDF - Page 1 Portrait
    let (doc, page1, layer1) = PdfDocument::new(
        "Meal Tracker Report",
        Mm(215.9),  // Letter width
        Mm(279.4),  // Letter height
        "Layer 1",
    );

    let font = doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| e.to_string())?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| e.to_string())?;

    let layer = doc.get_page(page1).get_layer(layer1);

    let page_height = 279.4;
    let margin_left = 15.0;
    let mut y = page_height - 20.0;

    // Title
    add_text(&layer, &font_bold, "Meal Tracker Report", Mm(margin_left), Mm(y), 18.0, COLOR_TITLE);
    y -= 10.0;

    add_text(&layer, &font, &format!("Month: {}", title_month), Mm(margin_left), Mm(y), 11.0, COLOR_BLACK);
    add_text(&layer, &font, &format!("Tracking since: {}", start_date), Mm(120.0), Mm(y), 11.0, COLOR_BLACK);
    y -= 6.0;

    let now = Local::now().format("%Y-%m-%d %H:%M").to_string();
    add_text(&layer, &font, &format!("Generated: {}", now), Mm(margin_left), Mm(y), 11.0, COLOR_BLACK);
    y -= 6.0;

    add_line(&layer, Mm(margin_left), Mm(y), Mm(200.0), Mm(y), COLOR_GRAY, 0.5);
    y -= 8.0;

    // Summary
    add_text(&layer, &font_bold, "Summary", Mm(margin_left), Mm(y), 12.0, COLOR_BLACK);
    y -= 6.0;

    add_text(&layer, &font, &format!("Tracked Days: {}", breakdown.total_tracked_days), Mm(margin_left), Mm(y), 10.0, COLOR_BLACK);
    add_text(&layer, &font, &format!("Expected Days: {}", breakdown.expected_days), Mm(80.0), Mm(y), 10.0, COLOR_BLACK);
    add_text(&layer, &font, &format!("Perfect Days: {}", breakdown.perfect_days), Mm(140.0), Mm(y), 10.0, COLOR_PERFECT);
    y -= 5.0;

    add_text(&layer, &font, &format!("Average Daily Score: {}%", breakdown.average_daily_score), Mm(margin_left), Mm(y), 10.0, COLOR_BLACK);
    add_text(&layer, &font, &format!("Completion Rate: {}%", breakdown.completion_rate), Mm(80.0), Mm(y), 10.0, COLOR_BLACK);
    let most_missed = most_missed_label(&breakdown.miss_counts);
    add_text(&layer, &font, &format!("Most Missed: {}", most_missed), Mm(140.0), Mm(y), 10.0, COLOR_MISSED);
    y -= 5.0;

    for (i, kind) in MealKind::ALL.iter().enumerate() {
        let text = format!(
            "{} missed: {} ({}%)",
            kind,
            breakdown.miss_counts.get(*kind),
            breakdown.miss_percentages.get(*kind)
        );
        add_text(&layer, &font, &text, Mm(margin_left + 62.5 * i as f32), Mm(y), 10.0, COLOR_BLACK);
    }
    y -= 10.0;

    // Per-day table
    add_text(&layer, &font_bold, "Daily Completion", Mm(margin_left), Mm(y), 12.0, COLOR_BLACK);
    y -= 6.0;

    let headers = ["Date", "Day", "Breakfast", "Lunch", "Dinner", "Meals"];
    let col_widths = [28.0, 16.0, 24.0, 20.0, 20.0, 20.0];

    let mut col_x = margin_left;
    for (header, width) in headers.iter().zip(col_widths.iter()) {
        add_text(&layer, &font_bold, header, Mm(col_x), Mm(y), 9.0, COLOR_BLACK);
        col_x += width;
    }
    y -= 2.0;
    add_line(&layer, Mm(margin_left), Mm(y), Mm(margin_left + 128.0), Mm(y), COLOR_GRAY, 0.3);
    y -= 4.0;

    for day in breakdown.per_day.values() {
        let date = day.date.format("%Y-%m-%d").to_string();
        let weekday = day.date.format("%a").to_string();

        let (values, color) = if day.before_start {
            ([date, weekday, "-".into(), "-".into(), "-".into(), "not tracked".into()], COLOR_GRAY)
        } else if day.is_future {
            ([date, weekday, "".into(), "".into(), "".into(), "upcoming".into()], COLOR_GRAY)
        } else {
            (
                [
                    date,
                    weekday,
                    meal_mark(day, MealKind::Breakfast).into(),
                    meal_mark(day, MealKind::Lunch).into(),
                    meal_mark(day, MealKind::Dinner).into(),
                    format!("{}/{}", day.completed, day.total),
                ],
                completion_color(day.completed),
            )
        };

        let mut col_x = margin_left;
        for (i, (value, width)) in values.iter().zip(col_widths.iter()).enumerate() {
            let cell_color = if i == values.len() - 1 { color } else { COLOR_BLACK };
            add_text(&layer, &font, value, Mm(col_x), Mm(y), 8.0, cell_color);
            col_x += width;
        }
        y -= 4.5;
    }

    // ========================================================================
    // Page 2 - Landscape for Chart
    // ========================================================================
    let (page2, layer2) = doc.add_page(Mm(279.4), Mm(215.9), "Chart Page");  // Landscape
    let layer2 = doc.get_page(page2).get_layer(layer2);

    let landscape_height = 215.9;
    let margin_left_p2 = 15.0;
    let mut y2 = landscape_height - 20.0;

    add_text(&layer2, &font_bold, "Daily Meal Completion", Mm(margin_left_p2), Mm(y2), 16.0, COLOR_TITLE);
    add_text(&layer2, &font, &title_month, Mm(120.0), Mm(y2), 11.0, COLOR_BLACK);
    y2 -= 10.0;

    match generate_completion_chart(&breakdown, 1000, 400) {
        Ok(png_bytes) => {
            let dynamic_image = printpdf::image_crate::load_from_memory(&png_bytes)
                .map_err(|e| e.to_string())?;
            let pdf_image = Image::from_dynamic_image(&dynamic_image);

            // 1000x400 pixels at 120 DPI = ~212mm x 85mm
            let transform = ImageTransform {
                translate_x: Some(Mm(margin_left_p2)),
                translate_y: Some(Mm(y2 - 90.0)),
                dpi: Some(120.0),
                ..Default::default()
            };

            pdf_image.add_to_layer(layer2.clone(), transform);
            y2 -= 95.0;
        }
        Err(e) => {
            add_text(&layer2, &font, &format!("Chart unavailable: {}", e), Mm(margin_left_p2), Mm(y2 - 10.0), 9.0, COLOR_GRAY);
            y2 -= 15.0;
        }
    }

    // Legend
    y2 -= 5.0;
    add_text(&layer2, &font_bold, "Legend:", Mm(margin_left_p2), Mm(y2), 10.0, COLOR_BLACK);
    add_text(&layer2, &font, "All 3 meals", Mm(45.0), Mm(y2), 10.0, COLOR_PERFECT);
    add_text(&layer2, &font, "1-2 meals", Mm(90.0), Mm(y2), 10.0, COLOR_PARTIAL);
    add_text(&layer2, &font, "No meals", Mm(130.0), Mm(y2), 10.0, COLOR_MISSED);

    // Save PDF
    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| e.to_string())?;

    tracing::info!(path = %output_path, month = %title_month, "monthly report written");

    Ok(GenerateReportResponse {
        success: true,
        file_path: output_path.to_string(),
        month: format!("{}-{:02}", year, month),
        total_tracked_days: breakdown.total_tracked_days,
        perfect_days: breakdown.perfect_days,
        average_daily_score: breakdown.average_daily_score,
        completion_rate: breakdown.completion_rate,
        message: format!(
            "Meal report for {} generated with {} tracked days",
            title_month, breakdown.total_tracked_days
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_date;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("data")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_completion_color() {
        assert_eq!(completion_color(3), COLOR_PERFECT);
        assert_eq!(completion_color(2), COLOR_PARTIAL);
        assert_eq!(completion_color(0), COLOR_MISSED);
    }

    #[test]
    fn test_most_missed_label() {
        assert_eq!(most_missed_label(&MissCounts::default()), "None");
        let counts = MissCounts { breakfast: 1, lunch: 4, dinner: 4 };
        assert_eq!(most_missed_label(&counts), "lunch, dinner");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2024, 2), "February 2024");
        assert_eq!(month_label(2024, 13), "2024-13");
    }

    #[test]
    fn test_chart_needs_tracked_days() {
        let today = parse_date("2024-01-10").unwrap();
        let first = parse_date("2024-02-01").unwrap();
        let breakdown = monthly_breakdown(first, today, today, &Default::default());
        assert!(generate_completion_chart(&breakdown, 200, 100).is_err());
    }

    #[test]
    fn test_generate_monthly_report_writes_pdf() {
        let (dir, db) = test_db();
        let today = parse_date("2024-01-10").unwrap();
        crate::tools::settings::update_settings(&db, Some("2024-01-05"), None).unwrap();
        for kind in MealKind::ALL {
            crate::tools::meals::mark_meal_complete(&db, "2024-01-06", kind.as_str()).unwrap();
        }
        crate::tools::meals::mark_meal_complete(&db, "2024-01-07", "lunch").unwrap();

        let output = dir.path().join("reports").join("january.pdf");
        let output = output.to_str().unwrap();
        let resp = generate_monthly_report(&db, 2024, 1, output, today).unwrap();

        assert!(resp.success);
        assert_eq!(resp.month, "2024-01");
        assert_eq!(resp.total_tracked_days, 2);
        assert_eq!(resp.perfect_days, 1);
        // 4 meals over 2 tracked days
        assert_eq!(resp.average_daily_score, 200);
        assert_eq!(resp.completion_rate, 67);

        let bytes = std::fs::read(output).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_generate_monthly_report_rejects_bad_input() {
        let (dir, db) = test_db();
        let today = parse_date("2024-01-10").unwrap();
        let output = dir.path().join("r.pdf");
        let output = output.to_str().unwrap();

        assert!(generate_monthly_report(&db, 2024, 0, output, today).is_err());
        assert!(generate_monthly_report(&db, 2024, 1, "  ", today).is_err());
        assert!(!dir.path().join("r.pdf").exists());
    }
}
