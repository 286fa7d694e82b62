use std::rc::Rc;

use xylem::{
    BindError, Binder, Capability, Element, Model, NativeValue, Resolved, Schema, SchemaBuilder,
    Scope, Value,
};

struct Company;
impl Model for Company {
    fn declare(schema: &mut SchemaBuilder) {
        schema
            .attributes(&["name", "industry"])
            .child::<Address>("address")
            .children::<Employee>("employees", "employee", Scope::named("employees"))
            .children::<Location>("locations", "location", Scope::Direct);
    }
}

struct Employee;
impl Model for Employee {
    fn declare(schema: &mut SchemaBuilder) {
        schema.attributes(&["name"]).parent::<Company>("company");
    }
}

struct Address;
impl Model for Address {
    fn declare(schema: &mut SchemaBuilder) {
        schema.optional_attributes(&["street", "city"]);
    }
}

struct Location;
impl Model for Location {
    fn declare(schema: &mut SchemaBuilder) {
        schema.parent::<Company>("company");
    }
}

const COMPANIES: &[u8] = br#"<?xml version="1.0"?>
<companies>
  <company reality="real" rank="1">
    <name>37Signals</name>
    <industry>software</industry>
    <address><street>123 Main</street><city>Chicago</city></address>
    <employees>
      <employee><name>David</name></employee>
      <employee><name>Jason</name></employee>
    </employees>
    <location>Chicago</location>
    <location>Remote</location>
  </company>
  <company><name>Initech</name><industry>software</industry></company>
  <company><name>Hooli</name><industry>software</industry></company>
  <company><name>Acme</name><industry>manufacturing</industry></company>
  <company><name>Milliways</name><industry>hospitality</industry></company>
</companies>"#;

fn binder() -> Binder {
    Binder::parse(COMPANIES).unwrap()
}

fn name_of(element: &Element) -> String {
    element
        .attr("name")
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_owned()
}

#[test]
fn find_all_returns_every_company_in_document_order() {
    let binder = binder();
    let companies = binder.find_all::<Company>(Some("//company")).unwrap();
    assert_eq!(companies.len(), 5);
    let names: Vec<String> = companies.iter().map(|c| name_of(c)).collect();
    assert_eq!(names, ["37Signals", "Initech", "Hooli", "Acme", "Milliways"]);

    // the default path is equivalent to //company
    let defaulted = binder.find_all::<Company>(None).unwrap();
    assert_eq!(defaulted.len(), 5);
    assert_eq!(defaulted[0], companies[0]);
}

#[test]
fn find_with_attribute_predicate_selects_the_real_company() {
    let binder = binder();
    let real = binder
        .find_all::<Company>(Some("//company[@reality='real']"))
        .unwrap();
    assert_eq!(real.len(), 1);
    assert_eq!(name_of(&real[0]), "37Signals");
}

#[test]
fn find_first_last_and_zero_match_contract() {
    let binder = binder();
    let first = binder.find_first::<Company>(None).unwrap().unwrap();
    assert_eq!(name_of(&first), "37Signals");
    let last = binder.find_last::<Company>(None).unwrap().unwrap();
    assert_eq!(name_of(&last), "Milliways");

    let missing = "companies/company[name='Wonka']";
    assert!(binder.find_all::<Company>(Some(missing)).unwrap().is_empty());
    assert!(binder.find_first::<Company>(Some(missing)).unwrap().is_none());
    assert!(binder.find_last::<Company>(Some(missing)).unwrap().is_none());
}

#[test]
fn attributes_are_typecast_at_construction() {
    let binder = binder();
    let company = binder.find_first::<Company>(None).unwrap().unwrap();
    assert_eq!(company.attr("reality"), Some(&Value::text("real")));
    assert_eq!(company.attr("rank"), Some(&Value::Int(1)));
    assert_eq!(company.attr("name"), Some(&Value::text("37Signals")));
    // address is a singleton child, not an attribute
    assert_eq!(company.attr("address"), None);
}

#[test]
fn employees_collection_has_two_members_and_knows_its_parent() {
    let binder = binder();
    let company = binder.find_first::<Company>(None).unwrap().unwrap();
    let employees = company.children("employees").unwrap();
    assert_eq!(employees.len().unwrap(), 2);

    let david = employees.get(0).unwrap().unwrap();
    assert_eq!(name_of(&david), "David");
    let back = david.parent("company").unwrap();
    assert_eq!(*back, *company);
}

#[test]
fn parent_round_trip_through_the_collection() {
    let binder = binder();
    let company = binder.find_first::<Company>(None).unwrap().unwrap();
    let employees = company.children("employees").unwrap();
    let child = employees.last().unwrap().unwrap();

    let parent = child.parent("company").unwrap();
    let from_parent = parent.children("employees").unwrap();
    let contains = from_parent
        .iter()
        .unwrap()
        .any(|member| **member == *child);
    assert!(contains);
}

#[test]
fn direct_children_enumerate_without_descending() {
    let binder = binder();
    let company = binder.find_first::<Company>(None).unwrap().unwrap();
    let locations = company.children("locations").unwrap();
    assert_eq!(locations.len().unwrap(), 2);
    for location in locations.iter().unwrap() {
        match location.get("name").unwrap() {
            Resolved::Native(NativeValue::Name(name)) => assert_eq!(name, "location"),
            other => panic!("expected native name, got {other:?}"),
        }
    }
    // the direct-scope parent walk still lands on the company, one level up
    let first = locations.first().unwrap().unwrap();
    assert_eq!(*first.parent("company").unwrap(), *company);
}

#[test]
fn children_proxy_is_cached_and_identity_stable() {
    let binder = binder();
    let company = binder.find_first::<Company>(None).unwrap().unwrap();
    let once = company.children("employees").unwrap();
    let twice = company.children("employees").unwrap();
    assert!(Rc::ptr_eq(&once, &twice));
    assert_eq!(once.items().unwrap().as_ptr(), twice.items().unwrap().as_ptr());
}

#[test]
fn singleton_child_is_optional_by_design() {
    let binder = binder();
    let with_address = binder.find_first::<Company>(None).unwrap().unwrap();
    let address = with_address.child("address").unwrap().unwrap();
    assert_eq!(address.attr("city"), Some(&Value::text("Chicago")));

    let without = binder.find_last::<Company>(None).unwrap().unwrap();
    assert_eq!(without.child("address").unwrap(), None);
}

#[test]
fn explicit_binding_equals_query_results() {
    let binder = binder();
    let via_query = binder.find_first::<Company>(None).unwrap().unwrap();
    let node = via_query.node();
    let via_bind = binder.bind::<Company>(node).unwrap();
    assert_eq!(*via_bind, *via_query);
    assert_eq!(via_bind.node(), node);
}

#[test]
fn competitors_style_computed_queries() {
    let binder = binder();
    let competitors = binder
        .find_all::<Company>(Some(
            "companies/company[industry='software' and name!='37Signals']",
        ))
        .unwrap();
    let names: Vec<String> = competitors.iter().map(|c| name_of(c)).collect();
    assert_eq!(names, ["Initech", "Hooli"]);
}

#[test]
fn capability_checks_mirror_resolution() {
    let binder = binder();
    let company = binder.find_first::<Company>(None).unwrap().unwrap();
    assert_eq!(company.capability("name"), Capability::Attribute);
    assert_eq!(company.capability("address"), Capability::Child);
    assert_eq!(company.capability("employees"), Capability::Children);
    assert_eq!(company.capability("node"), Capability::Native);
    assert_eq!(company.capability("bogus"), Capability::Unknown);
    assert!(matches!(
        company.get("bogus"),
        Err(BindError::UnknownAccessor(_))
    ));

    let employees = company.children("employees").unwrap();
    let employee = employees.first().unwrap().unwrap();
    assert_eq!(employee.capability("company"), Capability::Parent);
}

#[test]
fn schemas_resolve_once_per_type() {
    let first = Schema::of::<Company>();
    let second = Schema::of::<Company>();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.node_name(), "company");
}

#[test]
fn required_structure_is_enforced_at_construction() {
    let binder = Binder::parse(b"<companies><company><name>NoIndustry</name></company></companies>")
        .unwrap();
    match binder.find_first::<Company>(None) {
        Err(BindError::MissingStructure { parent, child }) => {
            assert_eq!(parent, "company");
            assert_eq!(child, "industry");
        }
        other => panic!("expected MissingStructure, got {other:?}"),
    }
}
