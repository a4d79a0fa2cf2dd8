//! # Patient Record Flow
//!
//! `PatientDashboard` → `Encryptor` → `IpfsClient` → `PatientNft`, and back.
//!
//! 1. Patient mints a health NFT
//! 2. Uploads a record: encrypted envelope pinned, CID written on chain
//! 3. Any device holding the patient's key can fetch and decrypt it
//! 4. A doctor with read access sees the pointer but cannot decrypt

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mc_02_encryption::{EncryptedPayload, EncryptionError};
    use mc_03_ipfs::InMemoryIpfs;
    use mc_04_contracts::{AccessLevel, ContractName, Token};
    use medichain_runtime::screens::{
        DoctorDashboard, NoProgress, PatientDashboard, RecordFile, Screen, ScreenState,
    };
    use medichain_runtime::ScreenError;
    use shared_types::U256;

    use crate::integration::fixtures::{record, World};

    const NFT: ContractName = ContractName::PatientNft;

    fn scan() -> RecordFile {
        RecordFile::new("mri.png", "image/png", vec![0x89, b'P', b'N', b'G', 1, 2, 3])
    }

    /// Connect, mint token 1 and return the registered dashboard.
    async fn registered_patient(
        world: &World,
        seed: u8,
    ) -> (PatientDashboard, shared_types::Address) {
        let party = world.party(seed);
        let session = party.connect().await;

        world.answer(NFT, "balanceOf", vec![Token::from(0u64)]);
        let screen = PatientDashboard::new(Arc::clone(&party.app));
        assert_eq!(
            screen.refresh().await.unwrap(),
            ScreenState::ConnectedUnregistered
        );

        world.emit(
            NFT,
            "mintPatientNFT",
            "PatientNFTMinted",
            vec![Token::from(1u64), session.address.into()],
        );
        world.answer(NFT, "balanceOf", vec![Token::from(1u64)]);
        world.answer(NFT, "tokenOfOwnerByIndex", vec![Token::from(1u64)]);
        world.answer(NFT, "getMedicalRecords", vec![Token::Array(vec![])]);
        assert_eq!(screen.register().await.unwrap(), U256::from(1u64));
        (screen, session.address)
    }

    #[tokio::test]
    async fn test_record_roundtrip_on_another_device() {
        let world = World::new();
        let (screen, patient) = registered_patient(&world, 0x31).await;

        let uploaded = screen.upload_record(&scan(), &NoProgress).await.unwrap();
        assert!(world.network.contains(&uploaded.cid));
        assert_eq!(world.sent(NFT, "addMedicalRecord"), 1);
        assert!(screen.cached_envelope(uploaded.index).is_some());

        // The chain now lists the record.
        world.answer(
            NFT,
            "getMedicalRecords",
            vec![Token::Array(vec![record(uploaded.cid.as_str(), patient)])],
        );

        let laptop = world.party(0x31);
        laptop.connect().await;
        let elsewhere = PatientDashboard::new(Arc::clone(&laptop.app));
        elsewhere.refresh().await.unwrap();
        assert_eq!(elsewhere.records().len(), 1);
        assert!(elsewhere.cached_envelope(0).is_none());
        assert_eq!(elsewhere.download_record(0).await.unwrap(), scan().data);
    }

    #[tokio::test]
    async fn test_granted_doctor_cannot_decrypt() {
        let world = World::new();
        let (screen, patient) = registered_patient(&world, 0x31).await;
        let uploaded = screen.upload_record(&scan(), &NoProgress).await.unwrap();

        let doctor = world.party(0x32);
        let doctor_session = doctor.connect().await;
        screen
            .grant_access(&doctor_session.address.to_string(), AccessLevel::Read)
            .await
            .unwrap();
        assert_eq!(world.sent(NFT, "grantAccess"), 1);

        world.answer(NFT, "getAccessLevel", vec![AccessLevel::Read.into()]);
        world.answer(
            NFT,
            "getMedicalRecords",
            vec![Token::Array(vec![record(uploaded.cid.as_str(), patient)])],
        );
        let dashboard = DoctorDashboard::new(Arc::clone(&doctor.app));
        let records = dashboard
            .view_patient_records(U256::from(1u64))
            .await
            .unwrap();
        assert_eq!(records[0].ipfs_hash, uploaded.cid.as_str());

        let blob = doctor.app.ipfs().download(&uploaded.cid).await.unwrap();
        let envelope = EncryptedPayload::from_slice(&blob).unwrap();
        let err = doctor
            .app
            .encryptor()
            .unwrap()
            .decrypt_bytes(&envelope)
            .await
            .unwrap_err();
        assert!(matches!(err, EncryptionError::DecryptionFailed));

        world.answer(NFT, "getAccessLevel", vec![AccessLevel::None.into()]);
        assert!(matches!(
            dashboard.view_patient_records(U256::from(1u64)).await,
            Err(ScreenError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn test_upload_falls_back_to_secondary_pinning() {
        let primary = Arc::new(InMemoryIpfs::unconfigured("web3.storage"));
        let secondary = Arc::new(InMemoryIpfs::named("pinata"));
        let world = World::with_pinners(
            vec![Arc::clone(&primary), Arc::clone(&secondary)],
            Arc::clone(&secondary),
        );
        let (screen, _) = registered_patient(&world, 0x33).await;

        let uploaded = screen.upload_record(&scan(), &NoProgress).await.unwrap();
        assert_eq!(primary.pin_count(), 0);
        assert_eq!(secondary.pin_count(), 1);
        assert!(!uploaded.url.is_empty());
        assert_eq!(world.sent(NFT, "addMedicalRecord"), 1);
    }

    #[tokio::test]
    async fn test_failed_pin_writes_nothing_on_chain() {
        let world = World::new();
        let (screen, _) = registered_patient(&world, 0x34).await;
        world.pinners[0].set_failing(true);

        assert!(matches!(
            screen.upload_record(&scan(), &NoProgress).await,
            Err(ScreenError::Ipfs(_))
        ));
        assert_eq!(world.sent(NFT, "addMedicalRecord"), 0);
    }
}
