use tracing::trace;

use super::person::PersonFactory;
use super::probability::ProbabilityEngine;
use crate::id::{FamilyId, IdGenerator};
use crate::model::{Date, EventKind, Family, LifeEvent, MaritalStatus, Person};
use crate::random::SeededRandom;

const MIN_MOTHER_AGE: i32 = 16;
const MAX_MOTHER_AGE: i32 = 50;

/// Forms marriages and populates them with children, enforcing the
/// mother-age and mother-alive plausibility constraints. Candidates that
/// violate them are dropped, never retried.
pub struct FamilyBuilder {
    ids: IdGenerator,
}

impl FamilyBuilder {
    pub fn new() -> Self {
        Self {
            ids: IdGenerator::new(),
        }
    }

    /// Marries the couple: symmetric spouse links, marriage ages, statuses,
    /// and life events, plus a sampled divorce that only sticks if both
    /// spouses are still alive at the divorce date.
    pub fn create_family(
        &mut self,
        rng: &mut SeededRandom,
        prob: &ProbabilityEngine<'_>,
        husband: &mut Person,
        wife: &mut Person,
    ) -> Family {
        let id = FamilyId(self.ids.next_id());

        let marriage_year = self.marriage_year(rng, prob, husband, wife);
        let marriage_date = random_date_in_year(rng, marriage_year);

        let mut family = Family::new(id, marriage_date);
        family.husband_id = Some(husband.id);
        family.wife_id = Some(wife.id);

        husband.spouse_ids.push(wife.id);
        wife.spouse_ids.push(husband.id);

        husband.marriage_age = Some(marriage_year - husband.birth_date.year());
        wife.marriage_age = Some(marriage_year - wife.birth_date.year());

        husband.marital_status = MaritalStatus::Married;
        wife.marital_status = MaritalStatus::Married;

        if prob.should_divorce(rng, marriage_year) {
            let divorce_year = prob.divorce_year(rng, marriage_year);
            let divorce_date = random_date_in_year(rng, divorce_year);

            let husband_alive = husband.death_date.is_none_or(|d| d > divorce_date);
            let wife_alive = wife.death_date.is_none_or(|d| d > divorce_date);

            if husband_alive && wife_alive {
                family.divorce_date = Some(divorce_date);
                husband.marital_status = MaritalStatus::Divorced;
                wife.marital_status = MaritalStatus::Divorced;

                husband.events.push(
                    LifeEvent::new(EventKind::Divorce, divorce_date, &husband.current_country)
                        .with_related_id(wife.id),
                );
                wife.events.push(
                    LifeEvent::new(EventKind::Divorce, divorce_date, &wife.current_country)
                        .with_related_id(husband.id),
                );
            }
        }

        husband.events.push(
            LifeEvent::new(EventKind::Marriage, marriage_date, &husband.current_country)
                .with_related_id(wife.id),
        );
        wife.events.push(
            LifeEvent::new(EventKind::Marriage, marriage_date, &wife.current_country)
                .with_related_id(husband.id),
        );

        trace!(family = %family.id, year = marriage_year, divorced = family.is_divorced(), "created family");
        family
    }

    /// Marriage year = the later of the two sampled marriage years, pulled
    /// back to a year before either spouse's death.
    fn marriage_year(
        &self,
        rng: &mut SeededRandom,
        prob: &ProbabilityEngine<'_>,
        husband: &Person,
        wife: &Person,
    ) -> i32 {
        let husband_age = prob.marriage_age(rng, crate::model::Gender::Male, husband.birth_date.year());
        let wife_age = prob.marriage_age(rng, crate::model::Gender::Female, wife.birth_date.year());

        let mut year = (husband.birth_date.year() + husband_age).max(wife.birth_date.year() + wife_age);

        if let Some(death) = husband.death_date
            && year > death.year()
        {
            year = death.year() - 1;
        }
        if let Some(death) = wife.death_date
            && year > death.year()
        {
            year = death.year() - 1;
        }
        year
    }

    /// Samples a children count for the marriage year and generates that many
    /// candidates, repairing or discarding implausible ones.
    pub fn generate_children(
        &mut self,
        rng: &mut SeededRandom,
        factory: &mut PersonFactory<'_>,
        family: &mut Family,
        husband: &mut Person,
        wife: &mut Person,
    ) -> Vec<Person> {
        let target = factory
            .probability()
            .children_count(rng, family.married_date.year());

        let mut children = Vec::with_capacity(target as usize);
        for index in 0..target as i32 {
            let mut child = factory.generate_child(rng, husband, wife, index);

            // Births sampled before the wedding shift forward past it
            if child.birth_date < family.married_date {
                let years_after = rng.int_range(1, 3) + index * rng.int_range(2, 4);
                let months = rng.int_range(0, 11) as u32;
                let days = rng.int_range(1, 28) as u32;
                child.birth_date = family.married_date.add(years_after, months, days);
                for event in &mut child.events {
                    if event.kind == EventKind::Birth {
                        event.date = child.birth_date;
                    }
                }
                // A death sampled against the old birth date may now precede
                // it; drop it and let the mortality pass re-cap if needed
                if child.death_date.is_some_and(|d| d < child.birth_date) {
                    child.death_date = None;
                    child.events.retain(|e| e.kind != EventKind::Death);
                }
            }

            if let Some(death) = wife.death_date
                && child.birth_date > death
            {
                continue;
            }
            let mother_age = child.birth_date.year() - wife.birth_date.year();
            if !(MIN_MOTHER_AGE..=MAX_MOTHER_AGE).contains(&mother_age) {
                continue;
            }

            family.add_child(child.id);
            husband.children_ids.push(child.id);
            wife.children_ids.push(child.id);
            husband.number_of_children += 1;
            wife.number_of_children += 1;
            children.push(child);
        }

        self.flag_single_parent(rng, factory.probability(), family, wife);

        children
    }

    /// Links an independently generated person into their parents' family,
    /// pulling the wedding back when it post-dates the child's birth so the
    /// marriage-before-children invariant survives the ancestor path.
    pub fn attach_existing_child(
        &mut self,
        rng: &mut SeededRandom,
        prob: &ProbabilityEngine<'_>,
        family: &mut Family,
        husband: &mut Person,
        wife: &mut Person,
        child: &Person,
    ) {
        family.add_child(child.id);

        if family.married_date > child.birth_date {
            let marriage_date = random_date_in_year(rng, child.birth_date.year() - 1);
            family.married_date = marriage_date;
            husband.marriage_age = Some(marriage_date.year() - husband.birth_date.year());
            wife.marriage_age = Some(marriage_date.year() - wife.birth_date.year());
            for spouse in [husband.events.iter_mut(), wife.events.iter_mut()] {
                for event in spouse {
                    if event.kind == EventKind::Marriage {
                        event.date = marriage_date;
                    }
                }
            }
        }

        self.flag_single_parent(rng, prob, family, wife);
    }

    /// Generates siblings of an ancestor-path person. They join the parents'
    /// child lists but not the family record: they model a different,
    /// unrecorded family unit.
    pub fn generate_siblings(
        &mut self,
        rng: &mut SeededRandom,
        factory: &mut PersonFactory<'_>,
        person: &Person,
        father: &mut Person,
        mother: &mut Person,
    ) -> Vec<Person> {
        let target = factory
            .probability()
            .sibling_count(rng, person.birth_date.year());

        let mut siblings = Vec::with_capacity(target as usize);
        for index in 0..target as i32 {
            let sibling = factory.generate_sibling(rng, person, father, mother, index);

            let mother_age = sibling.birth_date.year() - mother.birth_date.year();
            if !(MIN_MOTHER_AGE..=MAX_MOTHER_AGE).contains(&mother_age) {
                continue;
            }
            if let Some(death) = mother.death_date
                && sibling.birth_date > death
            {
                continue;
            }

            father.children_ids.push(sibling.id);
            mother.children_ids.push(sibling.id);
            siblings.push(sibling);
        }
        siblings
    }

    /// A divorced mother left with children may head a single-parent
    /// household.
    fn flag_single_parent(
        &self,
        rng: &mut SeededRandom,
        prob: &ProbabilityEngine<'_>,
        family: &Family,
        wife: &mut Person,
    ) {
        if let Some(divorce) = family.divorce_date
            && family.child_count() > 0
            && !wife.is_single_parent
            && prob.single_parent(rng, divorce.year())
        {
            wife.is_single_parent = true;
        }
    }
}

impl Default for FamilyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn random_date_in_year(rng: &mut SeededRandom, year: i32) -> Date {
    let month = rng.int_range(1, 12) as u8;
    let day = rng.int_range(1, 28) as u8;
    Date::new(year, month, day)
}
