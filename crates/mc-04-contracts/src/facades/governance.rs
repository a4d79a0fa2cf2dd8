//! Platform governance proposals and voting.

use super::{event_uint, send};
use crate::contract::ContractHandle;
use crate::domain::entities::{Proposal, ProposalState};
use crate::domain::errors::ContractError;
use crate::domain::rpc::TransactionReceipt;
use shared_types::{Address, U256};
use tracing::info;

/// Typed access to the governance contract.
#[derive(Debug, Clone)]
pub struct Governance {
    handle: ContractHandle,
}

impl Governance {
    #[must_use]
    pub fn new(handle: ContractHandle) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    /// Create a proposal and return its id.
    pub async fn create_proposal(&self, description: &str) -> Result<U256, ContractError> {
        let receipt = send(&self.handle, "createProposal", &[description.into()]).await?;
        let id = event_uint(&self.handle, &receipt, "ProposalCreated", "proposalId")?;
        info!(proposal_id = %id, "Proposal created");
        Ok(id)
    }

    pub async fn vote(&self, id: U256, support: bool) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "vote", &[id.into(), support.into()]).await
    }

    pub async fn execute(&self, id: U256) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "executeProposal", &[id.into()]).await
    }

    pub async fn cancel(&self, id: U256) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "cancelProposal", &[id.into()]).await
    }

    pub async fn get(&self, id: U256) -> Result<Proposal, ContractError> {
        let token = self.handle.read_one("getProposal", &[id.into()]).await?;
        Ok(Proposal::from_token(token)?)
    }

    pub async fn state(&self, id: U256) -> Result<ProposalState, ContractError> {
        let token = self.handle.read_one("getProposalState", &[id.into()]).await?;
        Ok(ProposalState::from_token(token)?)
    }

    pub async fn voting_power(&self, account: Address) -> Result<U256, ContractError> {
        Ok(self
            .handle
            .read_one("getVotingPower", &[account.into()])
            .await?
            .into_uint()?)
    }

    pub async fn has_voted(&self, id: U256, account: Address) -> Result<bool, ContractError> {
        Ok(self
            .handle
            .read_one("hasVoted", &[id.into(), account.into()])
            .await?
            .into_bool()?)
    }
}
