//! The listable entity kinds of the console.

use crate::text_entity;

text_entity! {
    pub struct Client / ClientDraft : Client {
        required {
            first_name => "First Name",
            last_name => "Last Name",
            primary_email => "Email",
            primary_phone => "Phone",
        }
        optional {
            city => "City",
            state => "State",
            country => "Country",
        }
    }
}

text_entity! {
    pub struct Vendor / VendorDraft : Vendor {
        required {
            first_name => "First Name",
            last_name => "Last Name",
            primary_email => "Email",
            primary_phone => "Phone",
        }
        optional {
            city => "City",
            state => "State",
            country => "Country",
            profile_image => "Profile Image",
        }
    }
}

text_entity! {
    /// A point of contact at a vendor.
    pub struct Contact / ContactDraft : Contact {
        required {
            fname => "First Name",
            lname => "Last Name",
            email1 => "Email",
            phone1 => "Phone",
        }
        optional {
            vendor_id => "Vendor",
            address1 => "Address 1",
            address2 => "Address 2",
            city => "City",
            county => "County",
            state => "State",
            zip => "Zip",
            country => "Country",
            profile_image => "Profile Image",
        }
    }
}

text_entity! {
    pub struct Role / RoleDraft : Role {
        required {
            name => "Role Name",
        }
        optional {
            employee_type => "Employee Type",
            department_uuid => "Department",
            default_activity => "Default Activity",
        }
    }
}

text_entity! {
    pub struct Candidate / CandidateDraft : Candidate {
        required {
            first_name => "First Name",
            last_name => "Last Name",
            primary_email => "Email",
        }
        optional {
            primary_phone => "Phone",
            city => "City",
            state => "State",
            country => "Country",
        }
    }
}
