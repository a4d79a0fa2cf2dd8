//! # Prescription Flow
//!
//! Doctor issues → QR payload → pharmacy scans, verifies and dispenses.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mc_04_contracts::{ContractName, MedicineCategory, PrescriptionStatus, Token};
    use medichain_runtime::screens::{
        AdminDashboard, DoctorDashboard, DoctorForm, PharmacyDashboard, PrescriptionForm,
        PrescriptionMetadata, Screen, ScreenState,
    };
    use medichain_runtime::ScreenError;
    use shared_types::{Address, U256};

    use crate::integration::fixtures::World;

    const RX: ContractName = ContractName::PrescriptionContract;

    fn form(patient: Address) -> PrescriptionForm {
        PrescriptionForm {
            patient_token_id: "1".into(),
            patient_address: patient.to_string(),
            medicine_name: "Metformin".into(),
            dosage: "850mg".into(),
            frequency: "2x daily".into(),
            duration: "90 days".into(),
            category: MedicineCategory::General,
            validity_days: 90,
            notes: String::new(),
        }
    }

    fn on_chain(
        id: u64,
        patient: Address,
        doctor: Address,
        expiry: u64,
        status: PrescriptionStatus,
    ) -> Token {
        Token::Tuple(vec![
            Token::from(id),
            Token::from(1u64),
            patient.into(),
            doctor.into(),
            Address::ZERO.into(),
            "Metformin".into(),
            "850mg".into(),
            "2x daily".into(),
            "90 days".into(),
            MedicineCategory::General.into(),
            "bafymetadata".into(),
            Token::from(1_700_000_000u64),
            Token::from(expiry),
            status.into(),
        ])
    }

    #[tokio::test]
    async fn test_issue_scan_and_dispense() {
        let world = World::new();
        let patient = world.party(0x41);
        let patient_address = patient.connect().await.address;

        // Doctor
        let doctor = world.party(0x42);
        let doctor_address = doctor.connect().await.address;
        world.answer(ContractName::DoctorRegistry, "isVerifiedDoctor", vec![Token::Bool(true)]);
        world.answer(
            ContractName::DoctorRegistry,
            "getDoctor",
            vec![Token::Tuple(vec![
                doctor_address.into(),
                "Dr. Who".into(),
                "General".into(),
                "LIC-7".into(),
                "TARDIS".into(),
                Token::Bool(true),
                Token::from(1u64),
                "".into(),
            ])],
        );
        world.answer(RX, "getDoctorPrescriptions", vec![Token::Array(vec![])]);
        let doctor_screen = DoctorDashboard::new(Arc::clone(&doctor.app));
        assert_eq!(
            doctor_screen.refresh().await.unwrap(),
            ScreenState::ConnectedRegistered
        );

        world.emit(
            RX,
            "issuePrescription",
            "PrescriptionIssued",
            vec![Token::from(12u64), Token::from(1u64), doctor_address.into()],
        );
        let issued = doctor_screen
            .issue_prescription(&form(patient_address))
            .await
            .unwrap();
        assert_eq!(issued.id, U256::from(12u64));
        let metadata: PrescriptionMetadata = doctor
            .app
            .ipfs()
            .download_json(&issued.metadata_cid)
            .await
            .unwrap();
        assert_eq!(metadata.medicine_name, "Metformin");
        let qr = issued.code.to_json().unwrap();

        // Pharmacy
        let pharmacy = world.party(0x43);
        pharmacy.connect().await;
        world.answer(
            ContractName::PharmacyRegistry,
            "isVerifiedPharmacy",
            vec![Token::Bool(false)],
        );
        let pharmacy_screen = PharmacyDashboard::new(Arc::clone(&pharmacy.app));
        assert_eq!(
            pharmacy_screen.refresh().await.unwrap(),
            ScreenState::ConnectedUnregistered
        );

        let id = pharmacy_screen.scan(&qr).unwrap();
        assert_eq!(id, issued.id);
        world.answer(RX, "verifyPrescription", vec![Token::Bool(true), "Valid".into()]);
        world.answer(
            RX,
            "getPrescription",
            vec![on_chain(
                12,
                patient_address,
                doctor_address,
                issued.expiry_date,
                PrescriptionStatus::Active,
            )],
        );
        let check = pharmacy_screen.verify(id).await.unwrap();
        assert!(check.can_dispense());
        assert_eq!(check.prescription.doctor_address, doctor_address);

        assert!(matches!(
            pharmacy_screen.dispense(id, false).await,
            Err(ScreenError::ConfirmationRequired)
        ));
        pharmacy_screen.dispense(id, true).await.unwrap();
        assert_eq!(world.sent(RX, "dispenseMedicine"), 1);
    }

    #[tokio::test]
    async fn test_revert_reason_reaches_pharmacist() {
        let world = World::new();
        let pharmacy = world.party(0x44);
        pharmacy.connect().await;
        let screen = PharmacyDashboard::new(Arc::clone(&pharmacy.app));

        world.answer(RX, "verifyPrescription", vec![Token::Bool(true), "Valid".into()]);
        world.answer(
            RX,
            "getPrescription",
            vec![on_chain(
                3,
                Address::new([1; 20]),
                Address::new([2; 20]),
                u64::MAX,
                PrescriptionStatus::Active,
            )],
        );
        world.revert(RX, "dispenseMedicine", "Only verified pharmacies can dispense");

        let err = screen.dispense(U256::from(3u64), true).await.unwrap_err();
        assert!(err
            .message()
            .contains("Only verified pharmacies can dispense"));
        assert_eq!(world.sent(RX, "dispenseMedicine"), 0);
    }

    #[tokio::test]
    async fn test_admin_onboards_doctor_who_then_issues() {
        let world = World::new();
        let admin = world.party(0x45);
        admin.connect().await;
        let doctor = world.party(0x46);
        let doctor_address = doctor.connect().await.address;

        let admin_screen = AdminDashboard::new(Arc::clone(&admin.app));
        admin_screen
            .register_doctor(
                &DoctorForm {
                    doctor_address: doctor_address.to_string(),
                    name: "Dr. Strange".into(),
                    specialization: "Neurosurgery".into(),
                    license_number: "NS-1".into(),
                    hospital_affiliation: "Metro General".into(),
                },
                None,
            )
            .await
            .unwrap();

        // Registered but not verified yet.
        world.answer(ContractName::DoctorRegistry, "isVerifiedDoctor", vec![Token::Bool(false)]);
        world.answer(RX, "getDoctorPrescriptions", vec![Token::Array(vec![])]);
        let doctor_screen = DoctorDashboard::new(Arc::clone(&doctor.app));
        doctor_screen.refresh().await.unwrap();
        assert!(doctor_screen
            .issue_prescription(&form(Address::new([9; 20])))
            .await
            .is_err());

        admin_screen
            .verify_doctor(&doctor_address.to_string())
            .await
            .unwrap();
        world.answer(ContractName::DoctorRegistry, "isVerifiedDoctor", vec![Token::Bool(true)]);
        world.answer(
            ContractName::DoctorRegistry,
            "getDoctor",
            vec![Token::Tuple(vec![
                doctor_address.into(),
                "Dr. Strange".into(),
                "Neurosurgery".into(),
                "NS-1".into(),
                "Metro General".into(),
                Token::Bool(true),
                Token::from(1u64),
                "".into(),
            ])],
        );
        assert_eq!(
            doctor_screen.refresh().await.unwrap(),
            ScreenState::ConnectedRegistered
        );
        assert_eq!(world.sent(ContractName::DoctorRegistry, "registerDoctor"), 1);
        assert_eq!(world.sent(ContractName::DoctorRegistry, "verifyDoctor"), 1);
    }
}
