//! Find Maids Page
//!
//! Browse public profiles. Filters go to the server as query parameters and
//! the list reloads whenever one changes.

use leptos::prelude::*;
use maid_core::MaidProfile;

use crate::api;

/// One dropdown filter: query key, label and choices
struct SelectFilter {
    key: &'static str,
    label: &'static str,
    choices: &'static [&'static str],
}

static SELECT_FILTERS: [SelectFilter; 10] = [
    SelectFilter {
        key: "location",
        label: "Location",
        choices: &["Kathmandu", "Lalitpur", "Bhaktapur", "Other"],
    },
    SelectFilter {
        key: "experience",
        label: "Experience",
        choices: &["0-1 years", "1-3 years", "3-5 years", "5+ years"],
    },
    SelectFilter {
        key: "salary",
        label: "Expected salary",
        choices: &["Below 15,000", "15,000-20,000", "20,000-25,000", "25,000+"],
    },
    SelectFilter {
        key: "gender",
        label: "Gender",
        choices: &["Male", "Female"],
    },
    SelectFilter {
        key: "ageGroup",
        label: "Age group",
        choices: &["18-25", "26-35", "36-45", "46+"],
    },
    SelectFilter {
        key: "skills",
        label: "Skill",
        choices: &["Cooking", "Cleaning", "Childcare", "Elderly Care", "Pet Care", "Laundry", "Ironing"],
    },
    SelectFilter {
        key: "languages",
        label: "Language",
        choices: &["Nepali", "English", "Hindi", "Newari", "Other"],
    },
    SelectFilter {
        key: "education",
        label: "Education",
        choices: &["High School", "Intermediate", "Bachelor", "Master", "Other"],
    },
    SelectFilter {
        key: "nationality",
        label: "Nationality",
        choices: &["Nepali", "Indian", "Other"],
    },
    SelectFilter {
        key: "workingTime",
        label: "Working time",
        choices: &["Full Time", "Part Time", "Flexible"],
    },
];

#[derive(Clone, Debug, PartialEq)]
enum Listing {
    Loading,
    Loaded(Vec<MaidProfile>),
    Failed(String),
}

/// Query pairs for the filters that are set
fn query_pairs(values: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
    values
        .into_iter()
        .map(|(key, value)| (key, value.trim().to_string()))
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

#[component]
fn MaidCard(maid: MaidProfile) -> impl IntoView {
    let href = format!("/maids/{}", maid.id);
    let details = [
        maid.preferred_location.clone(),
        maid.years_experience.clone(),
        maid.expected_salary.clone().map(|s| format!("Rs. {s}")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" · ");

    view! {
        <a class="maid-card" href=href>
            {maid.photo_url.clone().map(|src| view! { <img src=src alt=maid.full_name.clone() /> })}
            <h3>{maid.full_name.clone()}</h3>
            <p class="meta">{details}</p>
            <p class="skills">{maid.skills().join(", ")}</p>
        </a>
    }
}

#[component]
pub fn FindMaidsPage() -> impl IntoView {
    let search = RwSignal::new(String::new());
    let selects: Vec<(&'static SelectFilter, RwSignal<String>)> = SELECT_FILTERS
        .iter()
        .map(|filter| (filter, RwSignal::new(String::new())))
        .collect();
    let selects = StoredValue::new(selects);

    let (listing, set_listing) = signal(Listing::Loading);
    // Only the newest request may update the list
    let generation = StoredValue::new(0_u64);

    Effect::new(move |_| {
        let mut values = vec![("search", search.get())];
        selects.with_value(|selects| {
            values.extend(selects.iter().map(|(filter, value)| (filter.key, value.get())));
        });
        let pairs = query_pairs(values);

        let current = generation.get_value() + 1;
        generation.set_value(current);
        set_listing.set(Listing::Loading);

        leptos::task::spawn_local(async move {
            let next = match api::list_maids(&pairs).await {
                Ok(list) => Listing::Loaded(list.maids),
                Err(e) => Listing::Failed(e.message),
            };
            if generation.get_value() == current {
                set_listing.set(next);
            }
        });
    });

    let clear = move |_| {
        search.set(String::new());
        selects.with_value(|selects| selects.iter().for_each(|(_, value)| value.set(String::new())));
    };

    view! {
        <div class="find-maids">
            <h1>"Find maids"</h1>
            <div class="filters">
                <input
                    type="search"
                    placeholder="Search by name, skill or description"
                    bind:value=search
                />
                {selects
                    .get_value()
                    .into_iter()
                    .map(|(filter, value)| {
                        view! {
                            <label>
                                {filter.label}
                                <select
                                    prop:value=move || value.get()
                                    on:change=move |ev| value.set(event_target_value(&ev))
                                >
                                    <option value="">"Any"</option>
                                    {filter
                                        .choices
                                        .iter()
                                        .map(|choice| view! { <option value=*choice>{*choice}</option> })
                                        .collect_view()}
                                </select>
                            </label>
                        }
                    })
                    .collect_view()}
                <button class="btn" on:click=clear>"Clear filters"</button>
            </div>

            {move || match listing.get() {
                Listing::Loading => view! { <p class="loading">"Loading maids..."</p> }.into_any(),
                Listing::Failed(message) => view! { <p class="error">{message}</p> }.into_any(),
                Listing::Loaded(maids) if maids.is_empty() => {
                    view! { <p class="empty">"No maids match these filters."</p> }.into_any()
                }
                Listing::Loaded(maids) => view! {
                    <p class="count">{format!("{} maid(s) found", maids.len())}</p>
                    <div class="maid-grid">
                        {maids
                            .into_iter()
                            .map(|maid| view! { <MaidCard maid=maid /> })
                            .collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use maid_core::MaidFilter;

    use super::*;

    #[test]
    fn test_query_pairs_drop_unset_filters() {
        let pairs = query_pairs(vec![
            ("search", "  cook ".into()),
            ("gender", String::new()),
            ("workingTime", "Part Time".into()),
        ]);
        assert_eq!(
            pairs,
            vec![("search", "cook".to_string()), ("workingTime", "Part Time".to_string())]
        );
    }

    #[test]
    fn test_every_select_reaches_the_server_filter() {
        let values = SELECT_FILTERS
            .iter()
            .map(|f| (f.key, f.choices[0].to_string()))
            .collect();
        let query: serde_json::Map<String, serde_json::Value> = query_pairs(values)
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.into()))
            .collect();

        let filter: MaidFilter = serde_json::from_value(query.into()).unwrap();
        assert_eq!(filter.location.as_deref(), Some("Kathmandu"));
        assert_eq!(filter.age_group.as_deref(), Some("18-25"));
        assert_eq!(filter.skills.as_deref(), Some("Cooking"));
        assert_eq!(filter.working_time.as_deref(), Some("Full Time"));
        assert_eq!(filter.education.as_deref(), Some("High School"));
    }
}
