//! Trip briefing prompt.
//!
//! Pure compilation of [`TripInputs`] into the instruction text sent to the
//! model. Section order of the requested output is fixed: pre-departure
//! checklist, live-data block, overview table, then the per-day block.

use super::PromptBuilder;
use crate::constants::prompt::{OPTIONS_PER_STOP, TEMPLATE_VERSION};
use crate::trip::{HomeschoolTopic, PreferenceSet, TripInputs};

/// Domain context used when no other context is configured
pub const DEFAULT_STATIC_CONTEXT: &str = "The travelers are a family living full-time in a \
travel trailer and homeschooling their children on the road. They tow with a pickup, so \
every stop must fit a long rig: pull-through fuel lanes, truck or RV parking, and \
campgrounds with sites that take the full length. Avoid tight downtown streets, low \
clearances and unpaved access roads unless nothing else exists.";

const LIVE_SEARCH_DIRECTIVE: &str = "LIVE DATA REQUIRED: use Google Search before answering. \
Look up current fuel prices at every proposed fuel stop, road closures and construction on \
the route, and recent campground ratings and availability for every overnight option. \
Report what you found in the live-data block.";

const LIVE_SEARCH_DISCLAIMER: &str = "Live lookups are not available for this briefing. Base \
prices, closures and ratings on your most recent knowledge and mark them as estimates.";

const AUTO_TOPIC_INSTRUCTION: &str = "Choose the most relevant topic for each day from the \
geography, geology and history along that day's route";

/// Compile the briefing prompt.
///
/// Deterministic: identical arguments always produce the identical string.
pub fn compile(inputs: &TripInputs, static_context: &str, live_search: bool) -> String {
    let vehicle = inputs.vehicle();
    let fuel = vehicle.fuel_type();
    let hours = inputs.max_drive_hours();
    let mpg = vehicle.mpg.to_string();
    let topic = inputs.homeschool_topic();

    let header = format!(
        "### TRAVEL DAY BRIEFING PROMPT ({})\n\
         Instructions: Generate a segmented multi-day briefing with MULTIPLE options for every stop.",
        TEMPLATE_VERSION
    );

    let homeschool_objective = if topic.is_auto() {
        format!("{}, and name the chosen topic in each day's HOMESCHOOL heading.", AUTO_TOPIC_INSTRUCTION)
    } else {
        format!("Tie every HOMESCHOOL lesson to {}.", topic.label())
    };

    PromptBuilder::new()
        .custom(&header)
        .role(
            "RV trip planner",
            "towing logistics for families traveling full-time",
        )
        .context(
            "Input",
            [
                ("Departure", inputs.origin().to_string()),
                ("Destination", inputs.destination().to_string()),
                ("Start Date", inputs.departure_date().format("%Y-%m-%d").to_string()),
                ("Start Time", inputs.departure_time().format("%I:%M %p").to_string()),
                ("Max Driving Per Day", format!("{} hours", hours)),
            ],
        )
        .section("Context", static_context.trim())
        .context(
            "Rig",
            [
                (
                    "Rig",
                    format!(
                        "{} + {} ({}, {})",
                        vehicle.tow_vehicle, vehicle.trailer_name, vehicle.length, vehicle.weight
                    ),
                ),
                ("Fuel Type", fuel.to_string()),
                ("Fuel Economy", format!("{} MPG (use this to calculate fuel cost)", mpg)),
            ],
        )
        .bullets("Preferences", preference_lines(inputs.preferences()))
        .section(
            "Live Data",
            if live_search {
                LIVE_SEARCH_DIRECTIVE
            } else {
                LIVE_SEARCH_DISCLAIMER
            },
        )
        .objectives([
            format!(
                "Calculate total mileage and ESTIMATED FUEL COST ($) using {} MPG and current {} prices.",
                mpg, fuel
            ),
            format!("Split the route into days based on {} hours of driving.", hours),
            format!(
                "For EVERY STOP (fuel, lunch, overnight), provide {} DISTINCT, ranked options.",
                OPTIONS_PER_STOP
            ),
            "Provide specific Google Maps links for ALL locations.".to_string(),
            homeschool_objective,
        ])
        .section("Output Structure (Markdown)", &output_structure(inputs, &mpg))
        .build()
}

fn preference_lines(prefs: &PreferenceSet) -> Vec<String> {
    let topic = match prefs.homeschool_topic {
        HomeschoolTopic::Auto => format!("auto ({})", AUTO_TOPIC_INSTRUCTION),
        other => other.label().to_string(),
    };

    vec![
        format!(
            "Accommodation: {} / {}",
            if prefs.membership {
                "Thousand Trails/Harvest Hosts"
            } else {
                "Public/Paid"
            },
            if prefs.boondocking {
                "Boondocking OK"
            } else {
                "No Boondocking"
            }
        ),
        format!(
            "Dining: Slide-outs {}",
            if prefs.slide_out_dining {
                "Required"
            } else {
                "Not Required"
            }
        ),
        format!(
            "Luxury Break: {}",
            if prefs.luxury_break {
                "a Marriott/Amex hotel night is allowed"
            } else {
                "stay with the rig every night"
            }
        ),
        format!("Homeschool Topic: {}", topic),
    ]
}

fn output_structure(inputs: &TripInputs, mpg: &str) -> String {
    let fuel = inputs.vehicle().fuel_type();
    let topic = inputs.homeschool_topic();
    let homeschool_heading = if topic.is_auto() {
        "[Topic chosen for this day]".to_string()
    } else {
        topic.label().to_string()
    };
    let overnight_why = if inputs.preferences().membership {
        "Membership match"
    } else {
        "Price and availability"
    };

    format!(
        "✅ PRE-DEPARTURE CHECKLIST
* [Hitch, weight distribution and breakaway cable check]
* [Tire pressure for truck and trailer]
* [Route-specific items, e.g. chains, extra water, dump before leaving]

📡 LIVE DATA CHECK
* Fuel Prices: [What was found, or 'estimate']
* Closures/Construction: [What was found, or 'none known']
* Campground Ratings: [What was found, or 'estimate']

🚨 TRIP OVERVIEW & BUDGET
| Item | Value |
|---|---|
| Total Distance | [X] miles |
| Total Days | [X] |
| 💰 Est. Fuel Cost | $[X] (based on {mpg} MPG, {fuel}) |
| Status | GO / ⚠️ CAUTION |
| 🗺️ Route Map | [Google Maps Link] |

---
(REPEAT FOR EACH DAY)

## 📅 DAY [X]: [Start] ➡️ [End]
* Date: [Date]
* Stats: [X] Miles | [X] Hours

🌤️ WEATHER (Confidence: High/Med/Low)
* Forecast: [AM/PM summary]

📸 SIGHTSEEING
* [Worthwhile stop near the route with big-rig parking] - [Link]

⛽ FUEL STRATEGY ({options} Options)
* Option 1 (Best Price): [Station Name] ($[Price]) - [Link]
* Option 2 (Best Access/RV Lanes): [Station Name] - [Link]

🍴 LUNCH STRATEGY ({options} Options)
* Option A (Slide-outs OK): [Name/Location] - [Link]
    * Why: [e.g. Scenic rest area, large park]
* Option B (Restaurant/Fast): [Name/Location] - [Link]
    * Why: [e.g. Large lot, kid-friendly]

🛌 OVERNIGHT ({options} Options)
* Option 1 (Preferred): [Name] - [Link]
    * Why: [e.g. {overnight_why}]
* Option 2 (Backup): [Name] - [Link]
    * Why: [e.g. Location]

🎓 HOMESCHOOL ({homeschool_heading})
* Lesson: [Fact or activity tied to this day's route]

🛣️ HAZARDS
* [Steep Grades / Truck Routes / Wind / Parking Maneuver Analysis]

---",
        mpg = mpg,
        fuel = fuel,
        options = OPTIONS_PER_STOP,
        overnight_why = overnight_why,
        homeschool_heading = homeschool_heading,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::{FormState, FormUpdate};
    use chrono::{NaiveDate, NaiveTime};
    use proptest::prelude::*;

    fn inputs_with(updates: Vec<FormUpdate>) -> TripInputs {
        let today = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        FormState::new(today)
            .apply([
                FormUpdate::Origin("North Bend, WA".to_string()),
                FormUpdate::Destination("Moab, UT".to_string()),
                FormUpdate::DepartureTime(NaiveTime::from_hms_opt(7, 30, 0).unwrap()),
                FormUpdate::MaxDriveHours(7),
            ])
            .apply(updates)
            .snapshot()
            .unwrap()
    }

    #[test]
    fn test_every_field_is_interpolated() {
        let inputs = inputs_with(vec![
            FormUpdate::TowVehicle("2022 F-250 Diesel".to_string()),
            FormUpdate::Trailer("Grand Design 310".to_string()),
            FormUpdate::Length("35'".to_string()),
            FormUpdate::Weight("~11k lbs".to_string()),
            FormUpdate::Mpg(9.5),
            FormUpdate::Topic(HomeschoolTopic::Geology),
        ]);
        let prompt = compile(&inputs, "Context paragraph.", false);

        for literal in [
            "North Bend, WA",
            "Moab, UT",
            "2026-02-15",
            "07:30 AM",
            "7 hours",
            "2022 F-250 Diesel",
            "Grand Design 310",
            "35'",
            "~11k lbs",
            "9.5 MPG",
            "Geology & Earth Science",
            "Context paragraph.",
            "v12",
        ] {
            assert!(prompt.contains(literal), "missing {literal:?}");
        }
        assert!(prompt.contains("**Fuel Type**: Diesel"));
    }

    #[test]
    fn test_mpg_is_not_rounded() {
        let prompt = compile(&inputs_with(vec![FormUpdate::Mpg(8.25)]), "", false);
        assert!(prompt.contains("**Fuel Economy**: 8.25 MPG"));
        assert!(prompt.contains("(based on 8.25 MPG, Gas)"));
        assert!(!prompt.contains("8.2 MPG"));
    }

    #[test]
    fn test_fuel_type_defaults_to_gas() {
        let prompt = compile(&inputs_with(vec![]), DEFAULT_STATIC_CONTEXT, false);
        assert!(prompt.contains("**Fuel Type**: Gas"));
        assert!(prompt.contains("2023 RAM 2500 Rebel (Gas)"));
        assert!(prompt.contains("8.5 MPG"));
    }

    #[test]
    fn test_preference_flags_change_wording() {
        let prompt = compile(
            &inputs_with(vec![
                FormUpdate::Membership(false),
                FormUpdate::Boondocking(false),
                FormUpdate::SlideOutDining(false),
                FormUpdate::LuxuryBreak(false),
            ]),
            DEFAULT_STATIC_CONTEXT,
            false,
        );
        assert!(prompt.contains("Public/Paid / No Boondocking"));
        assert!(prompt.contains("Slide-outs Not Required"));
        assert!(prompt.contains("stay with the rig every night"));
    }

    #[test]
    fn test_auto_topic_asks_model_to_choose() {
        let prompt = compile(
            &inputs_with(vec![FormUpdate::Topic(HomeschoolTopic::Auto)]),
            DEFAULT_STATIC_CONTEXT,
            false,
        );
        assert!(prompt.contains(AUTO_TOPIC_INSTRUCTION));
        assert!(prompt.contains("HOMESCHOOL ([Topic chosen for this day])"));
    }

    #[test]
    fn test_live_search_directive_or_disclaimer() {
        let inputs = inputs_with(vec![]);

        let live = compile(&inputs, DEFAULT_STATIC_CONTEXT, true);
        assert!(live.contains("LIVE DATA REQUIRED"));
        assert!(live.contains("fuel prices"));
        assert!(live.contains("road closures and construction"));
        assert!(live.contains("campground ratings and availability"));
        assert!(!live.contains(LIVE_SEARCH_DISCLAIMER));

        let offline = compile(&inputs, DEFAULT_STATIC_CONTEXT, false);
        assert!(offline.contains(LIVE_SEARCH_DISCLAIMER));
        assert!(!offline.contains("LIVE DATA REQUIRED"));
    }

    #[test]
    fn test_output_sections_are_ordered() {
        let prompt = compile(&inputs_with(vec![]), DEFAULT_STATIC_CONTEXT, true);
        let order = [
            "PRE-DEPARTURE CHECKLIST",
            "LIVE DATA CHECK",
            "TRIP OVERVIEW & BUDGET",
            "WEATHER",
            "SIGHTSEEING",
            "FUEL STRATEGY",
            "LUNCH STRATEGY",
            "OVERNIGHT",
            "HOMESCHOOL (",
            "HAZARDS",
        ];

        let positions: Vec<usize> = order
            .iter()
            .map(|marker| prompt.find(marker).unwrap_or_else(|| panic!("missing {marker}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    proptest! {
        #[test]
        fn prop_compile_is_deterministic(
            origin in "[A-Za-z][A-Za-z ,]{0,20}[A-Za-z]",
            destination in "[A-Za-z][A-Za-z ,]{0,20}[A-Za-z]",
            hours in 2u8..=12,
            live in any::<bool>(),
        ) {
            let inputs = inputs_with(vec![
                FormUpdate::Origin(origin.clone()),
                FormUpdate::Destination(destination.clone()),
                FormUpdate::MaxDriveHours(hours),
            ]);

            let first = compile(&inputs, DEFAULT_STATIC_CONTEXT, live);
            let second = compile(&inputs, DEFAULT_STATIC_CONTEXT, live);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.contains(origin.as_str()));
            prop_assert!(first.contains(destination.as_str()));
            let hours_text = format!("{} hours", hours);
            prop_assert!(first.contains(hours_text.as_str()));
        }
    }
}
